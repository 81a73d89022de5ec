// src/paths/enumerator.rs

//! Lazy depth-first path enumeration.
//!
//! The search keeps its own stack instead of recursing, so deep surveys do
//! not grow the thread stack and the iterator can hand out one path at a
//! time. At each node the possible responses are reduced to one
//! representative per outgoing edge they select and per outcome of the
//! later tests on this node's answer; the DFS then branches over those
//! choices in priority order.

use std::sync::Arc;

use petgraph::graph::{EdgeIndex, NodeIndex};
use tracing::{debug, trace};

use crate::graph::{NodeKind, SurveyGraph};
use crate::paths::budget::{Budget, EnumerationLimits};
use crate::paths::candidates::candidates;
use crate::paths::path::{DeadEnd, DeadEndReason, Enumeration, Path, RuntimeAmbiguity};
use crate::predicate::{Assignment, EvalError, Value, evaluate};

/// Restartable source of paths over one graph.
#[derive(Debug, Clone)]
pub struct PathEnumerator<'g> {
    graph: &'g SurveyGraph,
    limits: EnumerationLimits,
}

impl<'g> PathEnumerator<'g> {
    pub fn new(graph: &'g SurveyGraph, limits: EnumerationLimits) -> Self {
        Self { graph, limits }
    }

    /// A fresh iterator with its own budget; calling this again restarts the
    /// enumeration from `start`.
    pub fn paths(&self) -> Paths<'g> {
        Paths::new(self.graph, Arc::new(Budget::new(self.limits)))
    }

    /// Drain a fresh iterator.
    pub fn enumerate(&self) -> Enumeration {
        self.paths().collect_enumeration()
    }
}

/// One way to leave a node: the edge taken and the response that takes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub edge: EdgeIndex,
    /// `None` when the node records no response (hidden or not a question).
    pub response: Option<Value>,
}

/// Result of looking at one node under the current partial assignment.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    /// Distinct routes out of this node, grouped by edge in priority order.
    pub choices: Vec<Choice>,
    pub dead_ends: Vec<DeadEnd>,
    pub ambiguities: Vec<RuntimeAmbiguity>,
}

/// Edge picked by runtime selection, plus any other conditional edges that
/// fired for the same assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub edge: EdgeIndex,
    pub also_fired: Vec<EdgeIndex>,
}

/// Runtime edge selection: the first firing edge in priority order.
///
/// When `unanswered` is set the node recorded no response, and references to
/// the node itself count as not firing. Any other evaluation error before an
/// edge is selected is returned with the offending edge.
pub fn select_edge(
    graph: &SurveyGraph,
    node: NodeIndex,
    assignment: &Assignment,
    unanswered: bool,
) -> Result<Option<Selection>, (EdgeIndex, EvalError)> {
    let own_id = graph.node_id(node);
    let mut selected: Option<Selection> = None;

    for &edge in graph.outgoing(node) {
        let conditional = graph.edge(edge).kind.is_conditional();
        let fires = match evaluate(graph.edge_predicate(edge), assignment) {
            Ok(fires) => fires,
            Err(EvalError::UnboundVariable(ref id)) if unanswered && id == own_id => false,
            Err(err) => {
                if selected.is_some() {
                    continue;
                }
                return Err((edge, err));
            }
        };
        if !fires {
            continue;
        }

        match selected.as_mut() {
            None => {
                selected = Some(Selection {
                    edge,
                    also_fired: Vec::new(),
                });
                if !conditional {
                    break;
                }
            }
            Some(sel) if conditional => sel.also_fired.push(edge),
            Some(_) => break,
        }
    }

    Ok(selected)
}

/// Work out the distinct ways of leaving `node`.
pub fn expand(graph: &SurveyGraph, node: NodeIndex, assignment: &Assignment) -> Expansion {
    let mut expansion = Expansion::default();
    let id = graph.node_id(node);

    let shown = match evaluate(graph.universe(node), assignment) {
        Ok(shown) => shown,
        Err(err) => {
            expansion.dead_ends.push(DeadEnd {
                node: id.to_string(),
                response: None,
                reason: DeadEndReason::UniverseEvaluation {
                    error: err.to_string(),
                },
            });
            return expansion;
        }
    };

    if graph.outgoing(node).is_empty() {
        expansion.dead_ends.push(DeadEnd {
            node: id.to_string(),
            response: None,
            reason: DeadEndReason::NoOutgoingEdges,
        });
        return expansion;
    }

    let responses: Vec<Option<Value>> = if shown && graph.node(node).kind == NodeKind::Question {
        candidates(graph, node).into_iter().map(Some).collect()
    } else {
        vec![None]
    };

    // A response is kept when it takes a new edge, or takes a known edge but
    // routes some later node differently.
    let mut seen: Vec<(EdgeIndex, Vec<Option<bool>>)> = Vec::new();
    let mut local = assignment.clone();
    for response in responses {
        match &response {
            Some(value) => {
                local.insert(id.to_string(), value.clone());
            }
            None => {
                local.remove(id);
            }
        }

        match select_edge(graph, node, &local, response.is_none()) {
            Ok(Some(selection)) => {
                if !selection.also_fired.is_empty() {
                    let edges = std::iter::once(selection.edge)
                        .chain(selection.also_fired.iter().copied())
                        .map(|e| graph.edge_id(e).to_string())
                        .collect();
                    expansion.ambiguities.push(RuntimeAmbiguity {
                        node: id.to_string(),
                        edges,
                        response: response.clone(),
                    });
                }
                let routing: Vec<Option<bool>> = graph
                    .downstream_tests(node)
                    .iter()
                    .map(|test| evaluate(test, &local).ok())
                    .collect();
                if !seen.contains(&(selection.edge, routing.clone())) {
                    seen.push((selection.edge, routing));
                    expansion.choices.push(Choice {
                        edge: selection.edge,
                        response,
                    });
                }
            }
            Ok(None) => expansion.dead_ends.push(DeadEnd {
                node: id.to_string(),
                response,
                reason: DeadEndReason::NoRoute,
            }),
            Err((edge, err)) => expansion.dead_ends.push(DeadEnd {
                node: id.to_string(),
                response,
                reason: DeadEndReason::Evaluation {
                    edge: graph.edge_id(edge).to_string(),
                    error: err.to_string(),
                },
            }),
        }
    }

    let out = graph.outgoing(node);
    let rank = |e: EdgeIndex| out.iter().position(|o| *o == e).unwrap_or(usize::MAX);
    expansion.choices.sort_by_key(|c| rank(c.edge));
    expansion
}

/// Fixed prefix a worker continues from.
#[derive(Debug, Clone, PartialEq)]
pub struct Seed {
    pub nodes: Vec<NodeIndex>,
    pub edges: Vec<EdgeIndex>,
    pub assignment: Assignment,
}

/// How the search space divides into independent subtrees.
#[derive(Debug, Clone)]
pub enum Split {
    /// No node with more than one choice before the search ends.
    Whole,
    /// One seed per choice of the first branching node, in priority order,
    /// plus what was observed along the shared prefix.
    Branches {
        seeds: Vec<Seed>,
        dead_ends: Vec<DeadEnd>,
        ambiguities: Vec<RuntimeAmbiguity>,
    },
}

/// Follow the unique prefix from `start` to the first node with several
/// choices.
pub fn split_frontier(graph: &SurveyGraph, limits: &EnumerationLimits) -> Split {
    let mut nodes = vec![graph.start()];
    let mut edges: Vec<EdgeIndex> = Vec::new();
    let mut assignment = Assignment::new();
    let mut dead_ends = Vec::new();
    let mut ambiguities = Vec::new();

    loop {
        let Some(&node) = nodes.last() else {
            return Split::Whole;
        };
        if graph.is_terminal(node) {
            return Split::Whole;
        }

        let expansion = expand(graph, node, &assignment);
        dead_ends.extend(expansion.dead_ends);
        ambiguities.extend(expansion.ambiguities);

        match expansion.choices.len() {
            0 => return Split::Whole,
            1 => {
                let choice = &expansion.choices[0];
                let target = graph.target(choice.edge);
                let too_deep = limits.max_depth.is_some_and(|max| edges.len() + 1 > max);
                if nodes.contains(&target) || too_deep {
                    return Split::Whole;
                }
                bind(&mut assignment, graph.node_id(node), choice.response.clone());
                edges.push(choice.edge);
                nodes.push(target);
            }
            _ => {
                let too_deep = limits.max_depth.is_some_and(|max| edges.len() + 1 > max);
                let loops_back = expansion
                    .choices
                    .iter()
                    .any(|c| nodes.contains(&graph.target(c.edge)));
                if too_deep || loops_back {
                    return Split::Whole;
                }
                let seeds = expansion
                    .choices
                    .iter()
                    .map(|choice| {
                        let mut seed = Seed {
                            nodes: nodes.clone(),
                            edges: edges.clone(),
                            assignment: assignment.clone(),
                        };
                        bind(&mut seed.assignment, graph.node_id(node), choice.response.clone());
                        seed.edges.push(choice.edge);
                        seed.nodes.push(graph.target(choice.edge));
                        seed
                    })
                    .collect();
                return Split::Branches {
                    seeds,
                    dead_ends,
                    ambiguities,
                };
            }
        }
    }
}

fn bind(assignment: &mut Assignment, id: &str, response: Option<Value>) {
    match response {
        Some(value) => {
            assignment.insert(id.to_string(), value);
        }
        None => {
            assignment.remove(id);
        }
    }
}

#[derive(Debug)]
struct Frame {
    node: NodeIndex,
    choices: Vec<Choice>,
    next: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Running,
    Done,
}

/// Iterator over paths; diagnostics accumulate as it runs.
#[derive(Debug)]
pub struct Paths<'g> {
    graph: &'g SurveyGraph,
    budget: Arc<Budget>,
    state: State,
    /// Node where the search begins: `start`, or the tip of a seed.
    root: NodeIndex,
    stack: Vec<Frame>,
    nodes: Vec<NodeIndex>,
    edges: Vec<EdgeIndex>,
    on_path: Vec<bool>,
    assignment: Assignment,
    dead_ends: Vec<DeadEnd>,
    ambiguities: Vec<RuntimeAmbiguity>,
}

impl<'g> Paths<'g> {
    pub fn new(graph: &'g SurveyGraph, budget: Arc<Budget>) -> Self {
        Self {
            graph,
            budget,
            state: State::Fresh,
            root: graph.start(),
            stack: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            on_path: vec![false; graph.node_count()],
            assignment: Assignment::new(),
            dead_ends: Vec::new(),
            ambiguities: Vec::new(),
        }
    }

    /// Continue from a fixed prefix, sharing `budget` with other workers.
    pub fn seeded(graph: &'g SurveyGraph, budget: Arc<Budget>, seed: Seed) -> Self {
        let mut paths = Self::new(graph, budget);
        let Seed {
            mut nodes,
            edges,
            assignment,
        } = seed;
        if let Some(tip) = nodes.pop() {
            paths.root = tip;
        }
        for n in &nodes {
            paths.on_path[n.index()] = true;
        }
        paths.nodes = nodes;
        paths.edges = edges;
        paths.assignment = assignment;
        paths
    }

    pub fn dead_ends(&self) -> &[DeadEnd] {
        &self.dead_ends
    }

    pub fn ambiguities(&self) -> &[RuntimeAmbiguity] {
        &self.ambiguities
    }

    pub fn budget(&self) -> &Arc<Budget> {
        &self.budget
    }

    /// Drain the iterator into an [`Enumeration`].
    pub fn collect_enumeration(mut self) -> Enumeration {
        let mut paths = Vec::new();
        for path in self.by_ref() {
            paths.push(path);
        }
        let enumeration = Enumeration {
            paths,
            dead_ends: self.dead_ends,
            ambiguities: self.ambiguities,
            truncated: self.budget.truncation(),
        };
        debug!(
            paths = enumeration.paths.len(),
            dead_ends = enumeration.dead_ends.len(),
            truncated = !enumeration.is_complete(),
            "enumeration finished"
        );
        enumeration
    }

    /// Put `node` on the path. Returns a finished path when `node` is a
    /// terminal and the budget allows one more.
    fn enter(&mut self, node: NodeIndex) -> Option<Path> {
        self.nodes.push(node);
        self.on_path[node.index()] = true;

        if self.graph.is_terminal(node) {
            let path = if self.budget.claim_path() {
                Some(Path {
                    nodes: self.nodes.clone(),
                    edges: self.edges.clone(),
                    assignment: self.assignment.clone(),
                })
            } else {
                None
            };
            self.pop_node();
            return path;
        }

        let expansion = expand(self.graph, node, &self.assignment);
        for dead_end in expansion.dead_ends {
            if !self.dead_ends.contains(&dead_end) {
                trace!(dead_end = %dead_end.describe(), "dead end");
                self.dead_ends.push(dead_end);
            }
        }
        for ambiguity in expansion.ambiguities {
            if !self.ambiguities.contains(&ambiguity) {
                self.ambiguities.push(ambiguity);
            }
        }
        self.stack.push(Frame {
            node,
            choices: expansion.choices,
            next: 0,
        });
        None
    }

    fn leave(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.assignment.remove(self.graph.node_id(frame.node));
            self.pop_node();
        }
    }

    fn pop_node(&mut self) {
        if let Some(node) = self.nodes.pop() {
            self.on_path[node.index()] = false;
            if !self.nodes.is_empty() {
                self.edges.pop();
            }
        }
    }
}

impl Iterator for Paths<'_> {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        if self.state == State::Fresh {
            self.state = State::Running;
            if let Some(path) = self.enter(self.root) {
                return Some(path);
            }
        }

        while self.state == State::Running {
            if self.budget.should_stop() {
                self.stack.clear();
                self.state = State::Done;
                break;
            }
            let Some(top) = self.stack.last_mut() else {
                self.state = State::Done;
                break;
            };
            if top.next == top.choices.len() {
                self.leave();
                continue;
            }

            let node = top.node;
            let choice = top.choices[top.next].clone();
            top.next += 1;

            bind(&mut self.assignment, self.graph.node_id(node), choice.response.clone());
            let target = self.graph.target(choice.edge);

            if self.on_path[target.index()] {
                let dead_end = DeadEnd {
                    node: self.graph.node_id(node).to_string(),
                    response: choice.response,
                    reason: DeadEndReason::Cycle {
                        edge: self.graph.edge_id(choice.edge).to_string(),
                        target: self.graph.node_id(target).to_string(),
                    },
                };
                if !self.dead_ends.contains(&dead_end) {
                    self.dead_ends.push(dead_end);
                }
                continue;
            }
            if self.budget.exceeds_depth(self.edges.len() + 1) {
                continue;
            }

            self.edges.push(choice.edge);
            if let Some(path) = self.enter(target) {
                return Some(path);
            }
        }

        None
    }
}
