// src/document/model.rs

//! Serde mapping of the survey document.
//!
//! ```json
//! {
//!   "survey_dag": {
//!     "metadata": { "title": "..." },
//!     "graph": {
//!       "start": "Q1",
//!       "terminals": ["END"],
//!       "nodes": [{ "id": "Q1", "type": "question",
//!                   "domain": { "kind": "enum", "values": [1, 2] } }],
//!       "edges": [{ "id": "E1", "source": "Q1", "target": "END",
//!                   "predicate": "P_Q1_EQ_1", "kind": "branch", "priority": 1 }]
//!     },
//!     "predicates": { "P_Q1_EQ_1": { "ast": ["==", "Q1", 1], "text": "Q1 == 1" } },
//!     "validation": null,
//!     "analysis": null
//!   }
//! }
//! ```
//!
//! Fields the analysis does not read are kept in `extra` maps so that a
//! populated document round-trips everything it was given.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::graph::{EdgeKind, NodeKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyDocument {
    pub survey_dag: SurveyDag,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyDag {
    /// Passed through unread.
    #[serde(default)]
    pub metadata: Json,

    pub graph: GraphSection,

    #[serde(default)]
    pub predicates: BTreeMap<String, PredicateEntry>,

    /// Written by the analysis.
    #[serde(default)]
    pub validation: Option<Json>,

    /// Written by the analysis.
    #[serde(default)]
    pub analysis: Option<Json>,

    #[serde(flatten)]
    pub extra: Map<String, Json>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSection {
    #[serde(default)]
    pub start: Option<String>,

    #[serde(default)]
    pub terminals: Vec<String>,

    #[serde(default)]
    pub nodes: Vec<NodeEntry>,

    #[serde(default)]
    pub edges: Vec<EdgeEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Json>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: String,

    #[serde(rename = "type", alias = "kind", default)]
    pub kind: NodeKind,

    /// `{"kind": "enum", "values": [...]}` and friends; see
    /// [`crate::graph::Domain`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Json>,

    /// `null`, a predicate id, or `{"predicate": "<id>", ...}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub universe: Option<Json>,

    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: Json,

    #[serde(flatten)]
    pub extra: Map<String, Json>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeEntry {
    pub id: String,
    pub source: String,
    pub target: String,

    /// Predicate id; absent or `null` means always true.
    #[serde(default)]
    pub predicate: Option<String>,

    #[serde(default)]
    pub kind: EdgeKind,

    #[serde(default)]
    pub priority: i64,

    #[serde(flatten)]
    pub extra: Map<String, Json>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredicateEntry {
    /// Nested-list AST, e.g. `["AND", ["==", "Q1", 1], [">", "Q2", 5]]`.
    pub ast: Json,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Json>,
}
