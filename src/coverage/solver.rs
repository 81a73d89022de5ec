// src/coverage/solver.rs

//! Greedy covering-set selection.
//!
//! Picking the fewest paths that touch every node and edge is set cover,
//! which is NP-hard. The greedy rule used here (take the path covering the
//! most still-uncovered elements) is within a logarithmic factor of the
//! optimum; the result is near-minimal, not guaranteed minimal.

use std::cmp::Ordering;

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::Serialize;
use tracing::debug;

use crate::graph::SurveyGraph;
use crate::paths::{Path, path_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    Node(NodeIndex),
    Edge(EdgeIndex),
}

/// Per-element result: covered or not, and by which selected paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementCover {
    pub id: String,
    pub covered: bool,
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    /// Indices into the enumerated path list, in selection order.
    pub selected: Vec<usize>,
    pub nodes: Vec<ElementCover>,
    pub edges: Vec<ElementCover>,
    /// Uncovered node ids (sorted) followed by uncovered edge ids (sorted).
    pub uncovered: Vec<String>,
    pub covered_elements: usize,
    pub total_elements: usize,
}

impl Coverage {
    /// Covered elements / total elements × 100.
    pub fn percentage(&self) -> f64 {
        if self.total_elements == 0 {
            return 100.0;
        }
        self.covered_elements as f64 * 100.0 / self.total_elements as f64
    }

    pub fn is_complete(&self) -> bool {
        self.uncovered.is_empty()
    }

    pub fn is_covered(&self, element: Element) -> bool {
        match element {
            Element::Node(n) => self.nodes[n.index()].covered,
            Element::Edge(e) => self.edges[e.index()].covered,
        }
    }
}

struct Candidate<'p> {
    index: usize,
    path: &'p Path,
    node_ids: Vec<&'p str>,
    edge_ids: Vec<&'p str>,
}

/// Select paths until every element is covered or no path adds anything.
pub fn solve(graph: &SurveyGraph, paths: &[Path]) -> Coverage {
    let mut node_covered = vec![false; graph.node_count()];
    let mut edge_covered = vec![false; graph.edge_count()];

    let mut remaining: Vec<Candidate<'_>> = paths
        .iter()
        .enumerate()
        .map(|(index, path)| Candidate {
            index,
            path,
            node_ids: path.node_ids(graph),
            edge_ids: path.edge_ids(graph),
        })
        .collect();
    let mut selected = Vec::new();

    loop {
        let gain = |c: &Candidate<'_>| {
            c.path.nodes.iter().filter(|n| !node_covered[n.index()]).count()
                + c.path.edges.iter().filter(|e| !edge_covered[e.index()]).count()
        };

        let mut best: Option<(usize, usize)> = None;
        for (pos, candidate) in remaining.iter().enumerate() {
            let g = gain(candidate);
            if g == 0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_pos, best_gain)) => {
                    prefer(g, candidate, best_gain, &remaining[best_pos]) == Ordering::Less
                }
            };
            if better {
                best = Some((pos, g));
            }
        }

        let Some((pos, g)) = best else { break };
        let chosen = remaining.remove(pos);
        for n in &chosen.path.nodes {
            node_covered[n.index()] = true;
        }
        for e in &chosen.path.edges {
            edge_covered[e.index()] = true;
        }
        debug!(path = %path_id(chosen.index), gain = g, "path selected for coverage");
        selected.push(chosen.index);
    }

    let covering = |element: Element| -> Vec<String> {
        selected
            .iter()
            .filter(|&&i| match element {
                Element::Node(n) => paths[i].nodes.contains(&n),
                Element::Edge(e) => paths[i].edges.contains(&e),
            })
            .map(|&i| path_id(i))
            .collect()
    };

    let nodes: Vec<ElementCover> = graph
        .node_indices()
        .map(|n| ElementCover {
            id: graph.node_id(n).to_string(),
            covered: node_covered[n.index()],
            paths: covering(Element::Node(n)),
        })
        .collect();
    let edges: Vec<ElementCover> = graph
        .edge_indices()
        .map(|e| ElementCover {
            id: graph.edge_id(e).to_string(),
            covered: edge_covered[e.index()],
            paths: covering(Element::Edge(e)),
        })
        .collect();

    let mut uncovered_nodes: Vec<String> =
        nodes.iter().filter(|c| !c.covered).map(|c| c.id.clone()).collect();
    let mut uncovered_edges: Vec<String> =
        edges.iter().filter(|c| !c.covered).map(|c| c.id.clone()).collect();
    uncovered_nodes.sort();
    uncovered_edges.sort();

    let total_elements = nodes.len() + edges.len();
    let uncovered_count = uncovered_nodes.len() + uncovered_edges.len();
    let mut uncovered = uncovered_nodes;
    uncovered.extend(uncovered_edges);

    Coverage {
        selected,
        nodes,
        edges,
        uncovered,
        covered_elements: total_elements - uncovered_count,
        total_elements,
    }
}

/// `Less` when `a` should be picked over `b`: higher gain, then fewer edges,
/// then the lexicographically smaller node-id sequence, then edge-id
/// sequence, then enumeration order.
fn prefer(gain_a: usize, a: &Candidate<'_>, gain_b: usize, b: &Candidate<'_>) -> Ordering {
    gain_b
        .cmp(&gain_a)
        .then_with(|| a.path.edges.len().cmp(&b.path.edges.len()))
        .then_with(|| a.node_ids.cmp(&b.node_ids))
        .then_with(|| a.edge_ids.cmp(&b.edge_ids))
        .then_with(|| a.index.cmp(&b.index))
}
