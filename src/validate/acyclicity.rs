// src/validate/acyclicity.rs

//! Three-color depth-first cycle detection from `start`.

use petgraph::graph::NodeIndex;

use crate::graph::SurveyGraph;
use crate::validate::findings::{Finding, FindingKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Every cycle closed by a back edge, as a node sequence with the first node
/// repeated at the end.
pub fn find_cycles(graph: &SurveyGraph) -> Vec<Vec<NodeIndex>> {
    let mut color = vec![Color::White; graph.node_count()];
    let mut cycles = Vec::new();

    // (node, position of the next outgoing edge to look at)
    let mut stack: Vec<(NodeIndex, usize)> = vec![(graph.start(), 0)];
    color[graph.start().index()] = Color::Gray;

    while let Some(top) = stack.last_mut() {
        let node = top.0;
        let out = graph.outgoing(node);
        if top.1 == out.len() {
            color[node.index()] = Color::Black;
            stack.pop();
            continue;
        }
        let target = graph.target(out[top.1]);
        top.1 += 1;

        match color[target.index()] {
            Color::White => {
                color[target.index()] = Color::Gray;
                stack.push((target, 0));
            }
            Color::Gray => {
                let from = stack
                    .iter()
                    .position(|(n, _)| *n == target)
                    .unwrap_or(0);
                let mut cycle: Vec<NodeIndex> = stack[from..].iter().map(|(n, _)| *n).collect();
                cycle.push(target);
                cycles.push(cycle);
            }
            Color::Black => {}
        }
    }

    cycles
}

pub fn check(graph: &SurveyGraph) -> Vec<Finding> {
    find_cycles(graph)
        .into_iter()
        .map(|cycle| {
            let ids: Vec<String> = cycle.iter().map(|n| graph.node_id(*n).to_string()).collect();
            let message = format!("cycle detected: {}", ids.join(" -> "));
            Finding::new(FindingKind::CycleDetected, ids, message)
        })
        .collect()
}
