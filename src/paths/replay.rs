// src/paths/replay.rs

//! Re-walk a survey with recorded responses.
//!
//! Responses are bound in visiting order, so every predicate sees exactly the
//! partial assignment it saw during enumeration. Replaying a path's own
//! assignment reproduces that path's node and edge sequence.

use petgraph::graph::{EdgeIndex, NodeIndex};
use thiserror::Error;

use crate::graph::SurveyGraph;
use crate::paths::enumerator::select_edge;
use crate::predicate::{Assignment, EvalError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplayError {
    #[error("no outgoing edge of '{node}' fires")]
    NoRoute { node: String },

    #[error("edge '{edge}' out of '{node}' failed to evaluate: {error}")]
    Evaluation {
        node: String,
        edge: String,
        error: EvalError,
    },

    #[error("replay returned to '{node}'")]
    Cycle { node: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    pub nodes: Vec<NodeIndex>,
    pub edges: Vec<EdgeIndex>,
}

pub fn replay(graph: &SurveyGraph, responses: &Assignment) -> Result<Replay, ReplayError> {
    let mut node = graph.start();
    let mut nodes = vec![node];
    let mut edges = Vec::new();
    let mut bound = Assignment::new();

    while !graph.is_terminal(node) {
        let id = graph.node_id(node);
        let response = responses.get(id);
        if let Some(value) = response {
            bound.insert(id.to_string(), value.clone());
        }

        let selection = select_edge(graph, node, &bound, response.is_none())
            .map_err(|(edge, error)| ReplayError::Evaluation {
                node: id.to_string(),
                edge: graph.edge_id(edge).to_string(),
                error,
            })?
            .ok_or_else(|| ReplayError::NoRoute {
                node: id.to_string(),
            })?;

        let target = graph.target(selection.edge);
        if nodes.contains(&target) {
            return Err(ReplayError::Cycle {
                node: graph.node_id(target).to_string(),
            });
        }
        edges.push(selection.edge);
        nodes.push(target);
        node = target;
    }

    Ok(Replay { nodes, edges })
}
