// src/graph/model.rs

use serde::{Deserialize, Serialize};

use crate::predicate::{Predicate, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Question,
    Terminal,
    #[serde(alias = "junction")]
    Instruction,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Question => "question",
            NodeKind::Terminal => "terminal",
            NodeKind::Instruction => "instruction",
        }
    }
}

/// How an edge participates in routing.
///
/// `Fallthrough` edges are taken only when no conditional edge fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Fallthrough,
    #[default]
    Branch,
    Terminate,
}

impl EdgeKind {
    pub fn is_conditional(self) -> bool {
        !matches!(self, EdgeKind::Fallthrough)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Fallthrough => "fallthrough",
            EdgeKind::Branch => "branch",
            EdgeKind::Terminate => "terminate",
        }
    }
}

/// Admissible responses for a node.
///
/// Unknown kinds deserialize as [`Domain::Other`] and are treated like free
/// text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Domain {
    Enum {
        #[serde(default)]
        values: Vec<Value>,
    },
    Set {
        #[serde(default)]
        values: Vec<Value>,
    },
    Numeric {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Text,
    Date,
    Terminal,
    #[serde(other)]
    Other,
}

impl Domain {
    /// Enumerated values, when the domain is finite.
    ///
    /// A `set` (multi-select) domain is reasoned about one selected value at
    /// a time.
    pub fn finite_values(&self) -> Option<&[Value]> {
        match self {
            Domain::Enum { values } | Domain::Set { values } => Some(values.as_slice()),
            _ => None,
        }
    }
}

/// Predicate attached to an edge or a node's universe.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Condition {
    #[default]
    Always,
    Predicate(String),
}

impl Condition {
    pub fn predicate_id(&self) -> Option<&str> {
        match self {
            Condition::Always => None,
            Condition::Predicate(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub domain: Option<Domain>,
    /// Condition under which the node is shown at all.
    pub universe: Condition,
    /// Passed through untouched.
    pub metadata: serde_json::Value,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            domain: None,
            universe: Condition::Always,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn with_universe(mut self, predicate_id: impl Into<String>) -> Self {
        self.universe = Condition::Predicate(predicate_id.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub id: String,
    pub kind: EdgeKind,
    pub condition: Condition,
    pub priority: i64,
    /// Position in the input document; last tie-breaker in priority order.
    pub order: usize,
}

/// Named predicate from the predicate table.
#[derive(Debug, Clone)]
pub struct PredicateDef {
    pub id: String,
    pub predicate: Predicate,
    /// Human-readable source text, if the document carried one.
    pub text: Option<String>,
}

/// Edge as handed to the builder, endpoints still by id.
#[derive(Debug, Clone)]
pub struct EdgeSpec {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub condition: Condition,
    pub priority: i64,
}

impl EdgeSpec {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::Branch,
            condition: Condition::Always,
            priority: 0,
        }
    }

    pub fn kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn when(mut self, predicate_id: impl Into<String>) -> Self {
        self.condition = Condition::Predicate(predicate_id.into());
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }
}
