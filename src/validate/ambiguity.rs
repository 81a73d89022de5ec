// src/validate/ambiguity.rs

//! Static detection of branches that can fire together.
//!
//! Only conditional edges are compared; a fallthrough edge never competes
//! with them. Pairs that cannot be decided are left to the path enumerator,
//! which reports them when it observes them.

use std::collections::BTreeSet;

use tracing::debug;

use crate::graph::SurveyGraph;
use crate::predicate::{Overlap, render_assignment};
use crate::validate::findings::{Finding, FindingKind};

pub fn check(graph: &SurveyGraph) -> Vec<Finding> {
    let mut findings = Vec::new();

    for node in graph.node_indices() {
        let conditional: Vec<_> = graph
            .outgoing(node)
            .iter()
            .copied()
            .filter(|e| graph.edge(*e).kind.is_conditional())
            .collect();
        if conditional.len() < 2 {
            continue;
        }

        let mut conflicting = BTreeSet::new();
        let mut witnesses = Vec::new();
        for (i, &a) in conditional.iter().enumerate() {
            for &b in &conditional[i + 1..] {
                match graph.overlap(graph.edge_predicate(a), graph.edge_predicate(b)) {
                    Overlap::Overlapping(witness) => {
                        conflicting.insert(graph.edge_id(a).to_string());
                        conflicting.insert(graph.edge_id(b).to_string());
                        witnesses.push(format!(
                            "{} and {} under {}",
                            graph.edge_id(a),
                            graph.edge_id(b),
                            render_assignment(&witness)
                        ));
                    }
                    Overlap::Exclusive => {}
                    Overlap::Undecided => {
                        debug!(
                            node = graph.node_id(node),
                            a = graph.edge_id(a),
                            b = graph.edge_id(b),
                            "overlap undecidable statically; deferred to enumeration"
                        );
                    }
                }
            }
        }

        if !conflicting.is_empty() {
            findings.push(Finding::new(
                FindingKind::AmbiguousBranch,
                conflicting.into_iter().collect(),
                format!(
                    "node '{}' has edges that can fire together: {}",
                    graph.node_id(node),
                    witnesses.join("; ")
                ),
            ));
        }
    }

    findings
}
