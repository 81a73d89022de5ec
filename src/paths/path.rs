// src/paths/path.rs

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::Serialize;

use crate::graph::SurveyGraph;
use crate::predicate::{Assignment, Value};

/// One traversal from `start` to a terminal, with the responses that drive it.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<NodeIndex>,
    pub edges: Vec<EdgeIndex>,
    pub assignment: Assignment,
}

impl Path {
    pub fn node_ids<'g>(&self, graph: &'g SurveyGraph) -> Vec<&'g str> {
        self.nodes.iter().map(|n| graph.node_id(*n)).collect()
    }

    pub fn edge_ids<'g>(&self, graph: &'g SurveyGraph) -> Vec<&'g str> {
        self.edges.iter().map(|e| graph.edge_id(*e)).collect()
    }

    pub fn record(&self, graph: &SurveyGraph, index: usize) -> PathRecord {
        PathRecord {
            id: path_id(index),
            nodes: self.node_ids(graph).into_iter().map(str::to_string).collect(),
            edges: self.edge_ids(graph).into_iter().map(str::to_string).collect(),
            assignment: self.assignment.clone(),
        }
    }
}

/// Stable id of the `index`-th enumerated path: `path_001`, `path_002`, ...
pub fn path_id(index: usize) -> String {
    format!("path_{:03}", index + 1)
}

/// Serializable form of a [`Path`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathRecord {
    pub id: String,
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
    pub assignment: Assignment,
}

/// Why a branch of the enumeration stopped without reaching a terminal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeadEndReason {
    /// An outgoing predicate failed to evaluate.
    Evaluation { edge: String, error: String },
    /// The node's universe condition failed to evaluate.
    UniverseEvaluation { error: String },
    /// No outgoing edge fires for this response.
    NoRoute,
    /// Non-terminal node with no outgoing edges at all.
    NoOutgoingEdges,
    /// The edge leads back to a node already on the path.
    Cycle { edge: String, target: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeadEnd {
    pub node: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    pub reason: DeadEndReason,
}

impl DeadEnd {
    pub fn describe(&self) -> String {
        let at = match &self.response {
            Some(v) => format!("node '{}' with response {v}", self.node),
            None => format!("node '{}'", self.node),
        };
        match &self.reason {
            DeadEndReason::Evaluation { edge, error } => {
                format!("dead end at {at}: edge '{edge}' failed to evaluate: {error}")
            }
            DeadEndReason::UniverseEvaluation { error } => {
                format!("dead end at {at}: universe failed to evaluate: {error}")
            }
            DeadEndReason::NoRoute => format!("dead end at {at}: no outgoing edge fires"),
            DeadEndReason::NoOutgoingEdges => {
                format!("dead end at {at}: no outgoing edges")
            }
            DeadEndReason::Cycle { edge, target } => {
                format!("dead end at {at}: edge '{edge}' returns to '{target}'")
            }
        }
    }
}

/// Two or more conditional edges fired for the same response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimeAmbiguity {
    pub node: String,
    pub edges: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationReason {
    MaxPaths,
    MaxDepth,
    TimeBudget,
}

impl TruncationReason {
    pub fn as_str(self) -> &'static str {
        match self {
            TruncationReason::MaxPaths => "max_paths",
            TruncationReason::MaxDepth => "max_depth",
            TruncationReason::TimeBudget => "time_budget",
        }
    }
}

/// Everything one enumeration run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enumeration {
    pub paths: Vec<Path>,
    pub dead_ends: Vec<DeadEnd>,
    pub ambiguities: Vec<RuntimeAmbiguity>,
    /// Empty when the enumeration is complete.
    pub truncated: Vec<TruncationReason>,
}

impl Enumeration {
    pub fn is_complete(&self) -> bool {
        self.truncated.is_empty()
    }

    /// Append `other`, keeping diagnostics free of duplicates.
    pub fn merge(&mut self, other: Enumeration) {
        self.paths.extend(other.paths);
        for dead_end in other.dead_ends {
            if !self.dead_ends.contains(&dead_end) {
                self.dead_ends.push(dead_end);
            }
        }
        for ambiguity in other.ambiguities {
            if !self.ambiguities.contains(&ambiguity) {
                self.ambiguities.push(ambiguity);
            }
        }
        for reason in other.truncated {
            if !self.truncated.contains(&reason) {
                self.truncated.push(reason);
            }
        }
        self.truncated.sort();
    }
}
