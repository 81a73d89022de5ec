// src/graph/survey_graph.rs

use std::collections::{BTreeMap, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::graph::model::{Condition, Edge, EdgeKind, Node, NodeKind, PredicateDef};
use crate::predicate::analysis::{self, Overlap, Truth};
use crate::predicate::{Predicate, Value};

static ALWAYS: Predicate = Predicate::LiteralTrue;

/// Immutable survey graph.
///
/// Nodes and edges are addressed by petgraph's stable integer indices; string
/// ids are only used at the boundaries (input, findings, reports). Nothing
/// here is mutable after construction, so a `SurveyGraph` can be shared
/// across enumeration workers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SurveyGraph {
    graph: DiGraph<Node, Edge>,
    node_ids: HashMap<String, NodeIndex>,
    edge_ids: HashMap<String, EdgeIndex>,
    predicates: BTreeMap<String, PredicateDef>,
    start: NodeIndex,
    terminals: Vec<NodeIndex>,
    terminal_flags: Vec<bool>,
    endpoints: Vec<(NodeIndex, NodeIndex)>,
    /// Outgoing edges per node, in priority order.
    outgoing: Vec<Vec<EdgeIndex>>,
    incoming: Vec<Vec<EdgeIndex>>,
    /// Constants compared against each node anywhere in the predicate table.
    hints: Vec<Vec<Value>>,
    /// Tests on each node's response made outside its own outgoing edges.
    downstream: Vec<Vec<Predicate>>,
    fingerprint: String,
}

impl SurveyGraph {
    pub(crate) fn from_parts(
        graph: DiGraph<Node, Edge>,
        node_ids: HashMap<String, NodeIndex>,
        edge_ids: HashMap<String, EdgeIndex>,
        predicates: BTreeMap<String, PredicateDef>,
        start: NodeIndex,
        terminals: Vec<NodeIndex>,
    ) -> Self {
        let n = graph.node_count();

        let mut terminal_flags: Vec<bool> = graph
            .node_indices()
            .map(|idx| graph[idx].kind == NodeKind::Terminal)
            .collect();
        for t in &terminals {
            terminal_flags[t.index()] = true;
        }

        let endpoints: Vec<(NodeIndex, NodeIndex)> = graph
            .edge_indices()
            .filter_map(|e| graph.edge_endpoints(e))
            .collect();

        let mut outgoing = vec![Vec::new(); n];
        let mut incoming = vec![Vec::new(); n];
        for idx in graph.node_indices() {
            let mut out: Vec<EdgeIndex> = graph
                .edges_directed(idx, Direction::Outgoing)
                .map(|e| e.id())
                .collect();
            out.sort_by_key(|e| {
                let edge = &graph[*e];
                (edge.kind == EdgeKind::Fallthrough, edge.priority, edge.order)
            });
            outgoing[idx.index()] = out;

            let mut inc: Vec<EdgeIndex> = graph
                .edges_directed(idx, Direction::Incoming)
                .map(|e| e.id())
                .collect();
            inc.sort_by_key(|e| graph[*e].order);
            incoming[idx.index()] = inc;
        }

        let hints = collect_hints(&node_ids, &predicates, n);

        let mut built = Self {
            graph,
            node_ids,
            edge_ids,
            predicates,
            start,
            terminals,
            terminal_flags,
            endpoints,
            outgoing,
            incoming,
            hints,
            downstream: Vec::new(),
            fingerprint: String::new(),
        };
        built.downstream = built.collect_downstream();
        built.fingerprint = built.compute_fingerprint();
        built
    }

    pub fn start(&self) -> NodeIndex {
        self.start
    }

    /// Declared terminals, in declaration order.
    pub fn terminals(&self) -> &[NodeIndex] {
        &self.terminals
    }

    /// Declared as a terminal or typed `terminal`.
    pub fn is_terminal(&self, node: NodeIndex) -> bool {
        self.terminal_flags[node.index()]
    }

    pub fn node(&self, node: NodeIndex) -> &Node {
        &self.graph[node]
    }

    pub fn edge(&self, edge: EdgeIndex) -> &Edge {
        &self.graph[edge]
    }

    pub fn node_id(&self, node: NodeIndex) -> &str {
        &self.graph[node].id
    }

    pub fn edge_id(&self, edge: EdgeIndex) -> &str {
        &self.graph[edge].id
    }

    pub fn find_node(&self, id: &str) -> Option<NodeIndex> {
        self.node_ids.get(id).copied()
    }

    pub fn find_edge(&self, id: &str) -> Option<EdgeIndex> {
        self.edge_ids.get(id).copied()
    }

    pub fn source(&self, edge: EdgeIndex) -> NodeIndex {
        self.endpoints[edge.index()].0
    }

    pub fn target(&self, edge: EdgeIndex) -> NodeIndex {
        self.endpoints[edge.index()].1
    }

    /// Outgoing edges in priority order: conditional kinds before
    /// fallthrough, then ascending priority, then document order.
    pub fn outgoing(&self, node: NodeIndex) -> &[EdgeIndex] {
        &self.outgoing[node.index()]
    }

    pub fn incoming(&self, node: NodeIndex) -> &[EdgeIndex] {
        &self.incoming[node.index()]
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn predicates(&self) -> impl Iterator<Item = &PredicateDef> {
        self.predicates.values()
    }

    pub fn predicate(&self, id: &str) -> Option<&PredicateDef> {
        self.predicates.get(id)
    }

    /// The predicate behind a condition; `Always` is the literal true.
    pub fn condition(&self, condition: &Condition) -> &Predicate {
        match condition {
            Condition::Always => &ALWAYS,
            Condition::Predicate(id) => self
                .predicates
                .get(id)
                .map(|def| &def.predicate)
                .unwrap_or(&ALWAYS),
        }
    }

    pub fn edge_predicate(&self, edge: EdgeIndex) -> &Predicate {
        self.condition(&self.graph[edge].condition)
    }

    pub fn universe(&self, node: NodeIndex) -> &Predicate {
        self.condition(&self.graph[node].universe)
    }

    /// Enumerated response values of a node, if its domain is finite.
    pub fn finite_domain(&self, id: &str) -> Option<&[Value]> {
        let idx = self.find_node(id)?;
        self.graph[idx].domain.as_ref()?.finite_values()
    }

    pub fn response_hints(&self, node: NodeIndex) -> &[Value] {
        &self.hints[node.index()]
    }

    /// Comparisons on `node`'s response read by other nodes' edges or
    /// universes. Two responses that agree on all of them route every later
    /// node the same way.
    pub fn downstream_tests(&self, node: NodeIndex) -> &[Predicate] {
        &self.downstream[node.index()]
    }

    pub fn static_truth(&self, predicate: &Predicate) -> Truth {
        analysis::static_truth(predicate, |id| self.finite_domain(id))
    }

    pub fn overlap(&self, a: &Predicate, b: &Predicate) -> Overlap {
        analysis::overlap(a, b, |id| self.finite_domain(id))
    }

    /// Underlying petgraph graph, for algorithms from `petgraph::algo`.
    pub fn petgraph(&self) -> &DiGraph<Node, Edge> {
        &self.graph
    }

    /// blake3 digest (hex) of the graph content.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    fn collect_downstream(&self) -> Vec<Vec<Predicate>> {
        let mut downstream: Vec<Vec<Predicate>> = vec![Vec::new(); self.node_count()];
        let mut add = |reader: NodeIndex, predicate: &Predicate| {
            for (id, test) in response_tests(predicate) {
                let Some(idx) = self.find_node(id) else {
                    continue;
                };
                let slot = &mut downstream[idx.index()];
                if idx != reader && !slot.contains(test) {
                    slot.push(test.clone());
                }
            }
        };

        for edge in self.edge_indices() {
            add(self.source(edge), self.edge_predicate(edge));
        }
        for node in self.node_indices() {
            add(node, self.universe(node));
        }
        downstream
    }

    fn compute_fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        let mut put = |field: &str| {
            hasher.update(field.as_bytes());
            hasher.update(&[0]);
        };

        put(self.node_id(self.start));
        for t in &self.terminals {
            put(self.node_id(*t));
        }
        for idx in self.graph.node_indices() {
            let node = &self.graph[idx];
            put(&node.id);
            put(node.kind.as_str());
            put(&format!("{:?}", node.domain));
            put(node.universe.predicate_id().unwrap_or(""));
        }
        for idx in self.graph.edge_indices() {
            let edge = &self.graph[idx];
            put(&edge.id);
            put(self.node_id(self.source(idx)));
            put(self.node_id(self.target(idx)));
            put(edge.kind.as_str());
            put(&edge.priority.to_string());
            put(edge.condition.predicate_id().unwrap_or(""));
        }
        for def in self.predicates.values() {
            put(&def.id);
            put(&def.predicate.to_string());
        }

        hasher.finalize().to_hex().to_string()
    }
}

/// Sub-expressions of `predicate` that test a single node's response,
/// paired with that node's id.
fn response_tests(predicate: &Predicate) -> Vec<(&str, &Predicate)> {
    let mut tests = Vec::new();
    predicate.visit(&mut |p| match p {
        Predicate::Comparison { lhs, rhs, .. } => {
            for side in [lhs.as_ref(), rhs.as_ref()] {
                if let Predicate::VariableRef(id) = side {
                    tests.push((id.as_str(), p));
                }
            }
        }
        Predicate::Membership { needle, .. } => {
            if let Predicate::VariableRef(id) = needle.as_ref() {
                tests.push((id.as_str(), p));
            }
        }
        Predicate::Logical { operands, .. } => {
            for operand in operands {
                if let Predicate::VariableRef(id) = operand {
                    tests.push((id.as_str(), operand));
                }
            }
        }
        _ => {}
    });
    tests
}

fn collect_hints(
    node_ids: &HashMap<String, NodeIndex>,
    predicates: &BTreeMap<String, PredicateDef>,
    node_count: usize,
) -> Vec<Vec<Value>> {
    let mut hints: Vec<Vec<Value>> = vec![Vec::new(); node_count];
    let mut add = |id: &str, value: &Value| {
        if let Some(idx) = node_ids.get(id) {
            let slot = &mut hints[idx.index()];
            if !slot.contains(value) {
                slot.push(value.clone());
            }
        }
    };

    for def in predicates.values() {
        def.predicate.visit(&mut |p| match p {
            Predicate::Comparison { lhs, rhs, .. } => match (lhs.as_ref(), rhs.as_ref()) {
                (Predicate::VariableRef(id), Predicate::Constant(v))
                | (Predicate::Constant(v), Predicate::VariableRef(id)) => add(id, v),
                _ => {}
            },
            Predicate::Membership { needle, set } => {
                if let Predicate::VariableRef(id) = needle.as_ref() {
                    for v in set {
                        add(id, v);
                    }
                }
            }
            _ => {}
        });
    }
    hints
}
