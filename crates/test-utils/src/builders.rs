#![allow(dead_code)]

use surveydag::errors::Result;
use surveydag::graph::{Domain, EdgeKind, EdgeSpec, GraphBuilder, Node, NodeKind, SurveyGraph};
use surveydag::predicate::{Predicate, Value};

/// Builder for `SurveyGraph` to simplify test setup.
///
/// Edges keep the order in which they are added, which is the document order
/// the graph uses as its last priority tie-breaker.
pub struct SurveyBuilder {
    inner: GraphBuilder,
}

impl SurveyBuilder {
    pub fn new() -> Self {
        Self {
            inner: GraphBuilder::new(),
        }
    }

    pub fn start(mut self, id: &str) -> Self {
        self.inner = self.inner.start(id);
        self
    }

    /// Question with an enumerated integer domain.
    pub fn question(self, id: &str, values: &[i64]) -> Self {
        self.node(Node::new(id, NodeKind::Question).with_domain(enum_domain(values)))
    }

    /// Question that is only shown when `predicate_id` holds.
    pub fn hidden_question(self, id: &str, values: &[i64], predicate_id: &str) -> Self {
        self.node(
            Node::new(id, NodeKind::Question)
                .with_domain(enum_domain(values))
                .with_universe(predicate_id),
        )
    }

    pub fn numeric(self, id: &str, min: Option<f64>, max: Option<f64>) -> Self {
        self.node(Node::new(id, NodeKind::Question).with_domain(Domain::Numeric { min, max }))
    }

    pub fn text(self, id: &str) -> Self {
        self.node(Node::new(id, NodeKind::Question).with_domain(Domain::Text))
    }

    pub fn instruction(self, id: &str) -> Self {
        self.node(Node::new(id, NodeKind::Instruction))
    }

    /// Terminal node, also declared in the terminal list.
    pub fn terminal(mut self, id: &str) -> Self {
        self.inner = self
            .inner
            .node(Node::new(id, NodeKind::Terminal).with_domain(Domain::Terminal))
            .terminal(id);
        self
    }

    pub fn node(mut self, node: Node) -> Self {
        self.inner = self.inner.node(node);
        self
    }

    pub fn predicate(mut self, id: &str, predicate: Predicate) -> Self {
        self.inner = self.inner.predicate(id, predicate);
        self
    }

    /// Unconditional branch edge.
    pub fn always(self, id: &str, from: &str, to: &str) -> Self {
        self.edge(EdgeSpec::new(id, from, to))
    }

    /// Branch edge guarded by an already registered predicate.
    pub fn branch(self, id: &str, from: &str, to: &str, predicate_id: &str) -> Self {
        self.edge(EdgeSpec::new(id, from, to).when(predicate_id))
    }

    /// Register `predicate` under `predicate_id` and guard a branch edge by it.
    pub fn when(self, id: &str, from: &str, to: &str, predicate_id: &str, predicate: Predicate) -> Self {
        self.predicate(predicate_id, predicate)
            .branch(id, from, to, predicate_id)
    }

    pub fn fallthrough(self, id: &str, from: &str, to: &str) -> Self {
        self.edge(EdgeSpec::new(id, from, to).kind(EdgeKind::Fallthrough))
    }

    pub fn edge(mut self, edge: EdgeSpec) -> Self {
        self.inner = self.inner.edge(edge);
        self
    }

    pub fn try_build(self) -> Result<SurveyGraph> {
        self.inner.build()
    }

    pub fn build(self) -> SurveyGraph {
        self.inner
            .build()
            .expect("Failed to build valid survey graph from builder")
    }
}

impl Default for SurveyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn enum_domain(values: &[i64]) -> Domain {
    Domain::Enum {
        values: values.iter().map(|v| Value::Int(*v)).collect(),
    }
}
