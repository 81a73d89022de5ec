// src/report/stats.rs

//! Descriptive statistics and topology of a survey graph.

use std::collections::{BTreeMap, VecDeque};

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::graph::SurveyGraph;
use crate::predicate::analysis::complexity;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub predicate_count: usize,
    pub terminal_count: usize,
    pub node_types: BTreeMap<String, usize>,
    pub edge_kinds: BTreeMap<String, usize>,
    /// Mean out-degree over nodes that have outgoing edges.
    pub avg_branching_factor: f64,
    pub max_branching_factor: usize,
    /// Longest shortest-distance (in edges) from start.
    pub max_depth: usize,
    /// Nodes with more than one outgoing edge.
    pub decision_points: usize,
    /// 0-10 scale mixing size, edge density and predicate complexity.
    pub complexity_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topology {
    /// Empty when the graph has a cycle.
    pub topological_order: Vec<String>,
    /// Longest start-to-terminal path; empty when cyclic or none exists.
    pub critical_path: Vec<String>,
    /// Components with more than one node, or a self loop.
    pub strongly_connected_components: Vec<Vec<String>>,
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub fn statistics(graph: &SurveyGraph) -> Statistics {
    let mut node_types = BTreeMap::new();
    for n in graph.node_indices() {
        *node_types
            .entry(graph.node(n).kind.as_str().to_string())
            .or_insert(0) += 1;
    }
    let mut edge_kinds = BTreeMap::new();
    for e in graph.edge_indices() {
        *edge_kinds
            .entry(graph.edge(e).kind.as_str().to_string())
            .or_insert(0) += 1;
    }

    let degrees: Vec<usize> = graph
        .node_indices()
        .map(|n| graph.outgoing(n).len())
        .filter(|d| *d > 0)
        .collect();
    let avg_branching = if degrees.is_empty() {
        0.0
    } else {
        degrees.iter().sum::<usize>() as f64 / degrees.len() as f64
    };

    let node_count = graph.node_count();
    let edge_count = graph.edge_count();
    let weights: Vec<f64> = graph
        .predicates()
        .map(|def| complexity(&def.predicate).weight())
        .collect();
    let predicate_score = if weights.is_empty() {
        0.0
    } else {
        weights.iter().sum::<f64>() / weights.len() as f64
    };
    let node_score = (node_count as f64 / 10.0).min(10.0);
    let edge_score = if node_count == 0 {
        0.0
    } else {
        (edge_count as f64 / node_count as f64).min(10.0)
    };

    Statistics {
        node_count,
        edge_count,
        predicate_count: weights.len(),
        terminal_count: graph.node_indices().filter(|n| graph.is_terminal(*n)).count(),
        node_types,
        edge_kinds,
        avg_branching_factor: round2(avg_branching),
        max_branching_factor: degrees.iter().copied().max().unwrap_or(0),
        max_depth: max_bfs_depth(graph),
        decision_points: degrees.iter().filter(|d| **d > 1).count(),
        complexity_score: round2(node_score * 0.3 + edge_score * 0.4 + predicate_score * 3.0 * 0.3),
    }
}

fn max_bfs_depth(graph: &SurveyGraph) -> usize {
    let mut depth: Vec<Option<usize>> = vec![None; graph.node_count()];
    let mut queue = VecDeque::from([graph.start()]);
    depth[graph.start().index()] = Some(0);
    let mut max = 0;

    while let Some(node) = queue.pop_front() {
        let d = depth[node.index()].unwrap_or(0);
        max = max.max(d);
        for &edge in graph.outgoing(node) {
            let target = graph.target(edge);
            if depth[target.index()].is_none() {
                depth[target.index()] = Some(d + 1);
                queue.push_back(target);
            }
        }
    }
    max
}

pub fn topology(graph: &SurveyGraph) -> Topology {
    let order = toposort(graph.petgraph(), None).unwrap_or_default();

    let mut components: Vec<Vec<String>> = tarjan_scc(graph.petgraph())
        .into_iter()
        .filter(|scc| {
            scc.len() > 1
                || scc
                    .first()
                    .is_some_and(|n| graph.outgoing(*n).iter().any(|e| graph.target(*e) == *n))
        })
        .map(|scc| {
            let mut ids: Vec<String> = scc.iter().map(|n| graph.node_id(*n).to_string()).collect();
            ids.sort();
            ids
        })
        .collect();
    components.sort();

    Topology {
        topological_order: order.iter().map(|n| graph.node_id(*n).to_string()).collect(),
        critical_path: critical_path(graph, &order),
        strongly_connected_components: components,
    }
}

/// Longest path (in edges) from start to any terminal, by dynamic
/// programming over a topological order.
fn critical_path(graph: &SurveyGraph, order: &[NodeIndex]) -> Vec<String> {
    if order.is_empty() {
        return Vec::new();
    }

    let mut dist: Vec<Option<usize>> = vec![None; graph.node_count()];
    let mut pred: Vec<Option<NodeIndex>> = vec![None; graph.node_count()];
    dist[graph.start().index()] = Some(0);

    for &node in order {
        let Some(d) = dist[node.index()] else { continue };
        for &edge in graph.outgoing(node) {
            let target = graph.target(edge);
            if dist[target.index()].map_or(true, |t| d + 1 > t) {
                dist[target.index()] = Some(d + 1);
                pred[target.index()] = Some(node);
            }
        }
    }

    let end = graph
        .node_indices()
        .filter(|n| graph.is_terminal(*n))
        .filter_map(|n| dist[n.index()].map(|d| (d, n)))
        .fold(None, |best: Option<(usize, NodeIndex)>, (d, n)| match best {
            Some((bd, _)) if bd >= d => best,
            _ => Some((d, n)),
        });
    let Some((_, end)) = end else {
        return Vec::new();
    };

    let mut path = vec![end];
    let mut cursor = end;
    while let Some(p) = pred[cursor.index()] {
        path.push(p);
        cursor = p;
    }
    path.reverse();
    path.iter().map(|n| graph.node_id(*n).to_string()).collect()
}
