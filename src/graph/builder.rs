// src/graph/builder.rs

//! One-shot construction of a [`SurveyGraph`].
//!
//! Every id reference is resolved here; a graph that comes out of
//! [`GraphBuilder::build`] never contains a dangling reference.

use std::collections::{BTreeMap, HashMap};

use petgraph::graph::DiGraph;
use tracing::debug;

use crate::errors::{Result, SurveyDagError};
use crate::graph::model::{Condition, Edge, EdgeSpec, Node, PredicateDef};
use crate::graph::survey_graph::SurveyGraph;
use crate::predicate::Predicate;
use crate::predicate::analysis::free_variables;

#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<EdgeSpec>,
    predicates: Vec<PredicateDef>,
    start: Option<String>,
    terminals: Vec<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn edge(mut self, edge: EdgeSpec) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn predicate(self, id: impl Into<String>, predicate: Predicate) -> Self {
        self.predicate_def(PredicateDef {
            id: id.into(),
            predicate,
            text: None,
        })
    }

    pub fn predicate_def(mut self, def: PredicateDef) -> Self {
        self.predicates.push(def);
        self
    }

    pub fn start(mut self, id: impl Into<String>) -> Self {
        self.start = Some(id.into());
        self
    }

    pub fn terminal(mut self, id: impl Into<String>) -> Self {
        self.terminals.push(id.into());
        self
    }

    /// Resolve every reference and freeze the graph.
    pub fn build(self) -> Result<SurveyGraph> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut node_ids = HashMap::with_capacity(self.nodes.len());

        for node in self.nodes {
            if node_ids.contains_key(&node.id) {
                return Err(malformed(format!("duplicate node id '{}'", node.id)));
            }
            let id = node.id.clone();
            let idx = graph.add_node(node);
            node_ids.insert(id, idx);
        }

        let mut predicates = BTreeMap::new();
        for def in self.predicates {
            for var in free_variables(&def.predicate) {
                if !node_ids.contains_key(&var) {
                    return Err(malformed(format!(
                        "predicate '{}' references unknown node '{var}'",
                        def.id
                    )));
                }
            }
            if predicates.contains_key(&def.id) {
                return Err(malformed(format!("duplicate predicate id '{}'", def.id)));
            }
            predicates.insert(def.id.clone(), def);
        }

        for node in graph.node_weights() {
            if let Condition::Predicate(id) = &node.universe {
                if !predicates.contains_key(id) {
                    return Err(malformed(format!(
                        "node '{}' has unknown universe predicate '{id}'",
                        node.id
                    )));
                }
            }
        }

        let mut edge_ids = HashMap::with_capacity(self.edges.len());
        for (order, spec) in self.edges.into_iter().enumerate() {
            if edge_ids.contains_key(&spec.id) {
                return Err(malformed(format!("duplicate edge id '{}'", spec.id)));
            }
            let source = *node_ids.get(&spec.source).ok_or_else(|| {
                malformed(format!("edge '{}' has unknown source '{}'", spec.id, spec.source))
            })?;
            let target = *node_ids.get(&spec.target).ok_or_else(|| {
                malformed(format!("edge '{}' has unknown target '{}'", spec.id, spec.target))
            })?;
            if let Condition::Predicate(id) = &spec.condition {
                if !predicates.contains_key(id) {
                    return Err(malformed(format!(
                        "edge '{}' has unknown predicate '{id}'",
                        spec.id
                    )));
                }
            }

            let id = spec.id.clone();
            let idx = graph.add_edge(
                source,
                target,
                Edge {
                    id: spec.id,
                    kind: spec.kind,
                    condition: spec.condition,
                    priority: spec.priority,
                    order,
                },
            );
            edge_ids.insert(id, idx);
        }

        let start_id = self
            .start
            .ok_or_else(|| malformed("graph has no start node".to_string()))?;
        let start = *node_ids
            .get(&start_id)
            .ok_or_else(|| malformed(format!("start node '{start_id}' is not declared")))?;

        if self.terminals.is_empty() {
            return Err(malformed("graph declares no terminals".to_string()));
        }
        let mut terminals = Vec::with_capacity(self.terminals.len());
        for id in &self.terminals {
            let idx = *node_ids
                .get(id)
                .ok_or_else(|| malformed(format!("terminal '{id}' is not declared")))?;
            if !terminals.contains(&idx) {
                terminals.push(idx);
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            predicates = predicates.len(),
            "survey graph constructed"
        );

        Ok(SurveyGraph::from_parts(
            graph, node_ids, edge_ids, predicates, start, terminals,
        ))
    }
}

fn malformed(msg: String) -> SurveyDagError {
    SurveyDagError::MalformedGraph(msg)
}
