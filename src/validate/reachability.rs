// src/validate/reachability.rs

//! Breadth-first reachability from `start`.
//!
//! Edges whose predicate is provably always false are not followed. Anything
//! that cannot be decided statically is treated as possibly true.

use std::collections::VecDeque;

use crate::graph::SurveyGraph;
use crate::predicate::Truth;
use crate::validate::findings::{Finding, FindingKind};

/// Visited flag per node index.
pub fn reachable(graph: &SurveyGraph) -> Vec<bool> {
    let mut visited = vec![false; graph.node_count()];
    let mut queue = VecDeque::new();

    visited[graph.start().index()] = true;
    queue.push_back(graph.start());

    while let Some(node) = queue.pop_front() {
        for &edge in graph.outgoing(node) {
            if graph.static_truth(graph.edge_predicate(edge)) == Truth::AlwaysFalse {
                continue;
            }
            let target = graph.target(edge);
            if !visited[target.index()] {
                visited[target.index()] = true;
                queue.push_back(target);
            }
        }
    }

    visited
}

/// `OrphanNode` for every unvisited node and `UnreachableTerminal` for every
/// unvisited declared terminal.
pub fn check(graph: &SurveyGraph) -> Vec<Finding> {
    let visited = reachable(graph);
    let start = graph.node_id(graph.start());
    let mut findings = Vec::new();

    for node in graph.node_indices() {
        if visited[node.index()] {
            continue;
        }
        let id = graph.node_id(node);
        let detail = if graph.incoming(node).is_empty() {
            "it has no incoming edges"
        } else {
            "none of its incoming edges can be reached"
        };
        findings.push(Finding::new(
            FindingKind::OrphanNode,
            vec![id.to_string()],
            format!("node '{id}' is not reachable from start '{start}': {detail}"),
        ));
    }

    for &terminal in graph.terminals() {
        if visited[terminal.index()] {
            continue;
        }
        let id = graph.node_id(terminal);
        findings.push(Finding::new(
            FindingKind::UnreachableTerminal,
            vec![id.to_string()],
            format!("terminal '{id}' is not reachable from start '{start}'"),
        ));
    }

    findings
}
