// src/validate/flow.rs

//! Local flow checks around start, terminals and the predicate table.

use std::collections::BTreeSet;

use crate::graph::SurveyGraph;
use crate::predicate::analysis::type_errors;
use crate::validate::findings::{Finding, FindingKind};
use crate::validate::reachability::reachable;

pub fn check(graph: &SurveyGraph) -> Vec<Finding> {
    let mut findings = Vec::new();
    let start = graph.start();
    let start_id = graph.node_id(start);

    if graph.is_terminal(start) && graph.node_count() > 1 {
        findings.push(Finding::new(
            FindingKind::StartIsTerminal,
            vec![start_id.to_string()],
            format!("start node '{start_id}' is also a terminal"),
        ));
    }

    if !graph.incoming(start).is_empty() {
        let ids: Vec<String> = graph
            .incoming(start)
            .iter()
            .map(|e| graph.edge_id(*e).to_string())
            .collect();
        findings.push(Finding::new(
            FindingKind::StartHasIncoming,
            std::iter::once(start_id.to_string()).chain(ids.iter().cloned()).collect(),
            format!("start node '{start_id}' has incoming edges: {}", ids.join(", ")),
        ));
    }

    let visited = reachable(graph);
    for node in graph.node_indices() {
        let id = graph.node_id(node);
        let out = graph.outgoing(node);
        if graph.is_terminal(node) {
            if !out.is_empty() {
                findings.push(Finding::new(
                    FindingKind::TerminalHasOutgoing,
                    vec![id.to_string()],
                    format!("terminal '{id}' has {} outgoing edge(s)", out.len()),
                ));
            }
        } else if out.is_empty() && visited[node.index()] {
            findings.push(Finding::new(
                FindingKind::DeadEndNode,
                vec![id.to_string()],
                format!("node '{id}' is not a terminal but has no outgoing edges"),
            ));
        }
    }

    findings
}

/// Ill-typed and unused predicates.
pub fn check_predicates(graph: &SurveyGraph) -> Vec<Finding> {
    let mut findings = Vec::new();

    let mut used = BTreeSet::new();
    for edge in graph.edge_indices() {
        if let Some(id) = graph.edge(edge).condition.predicate_id() {
            used.insert(id.to_string());
        }
    }
    for node in graph.node_indices() {
        if let Some(id) = graph.node(node).universe.predicate_id() {
            used.insert(id.to_string());
        }
    }

    for def in graph.predicates() {
        let errors = type_errors(&def.predicate);
        if !errors.is_empty() {
            findings.push(Finding::new(
                FindingKind::InvalidPredicate,
                vec![def.id.clone()],
                format!("predicate '{}' is ill-typed: {}", def.id, errors.join("; ")),
            ));
        }
        if !used.contains(&def.id) {
            findings.push(Finding::new(
                FindingKind::UnusedPredicate,
                vec![def.id.clone()],
                format!("predicate '{}' is not referenced by any edge or node", def.id),
            ));
        }
    }

    findings
}
