// src/report/recommend.rs

//! Plain-language guidance for survey designers.
//!
//! Each rule looks at one part of the finished report and contributes at
//! most one line. Rules run in a fixed order, so the list is as
//! deterministic as the report itself.

use crate::report::{CoverageSummary, EnumerationSummary, Statistics, Topology};
use crate::validate::{Finding, FindingKind, Gates};

/// Coverage below this percentage is worth a recommendation.
pub const LOW_COVERAGE: f64 = 80.0;

/// More decision points than this suggests overly intricate routing.
pub const MANY_DECISION_POINTS: usize = 20;

pub fn recommendations(
    gates: &Gates,
    findings: &[Finding],
    statistics: &Statistics,
    topology: &Topology,
    enumeration: &EnumerationSummary,
    coverage: &CoverageSummary,
) -> Vec<String> {
    let count = |kind: FindingKind| findings.iter().filter(|f| f.kind == kind).count();
    let mut out = Vec::new();

    if !gates.acyclic {
        out.push("Fix cycles in the graph; survey routing must be acyclic".to_string());
    }

    let orphans = count(FindingKind::OrphanNode);
    if orphans > 0 {
        out.push(format!("Add routing to make {orphans} node(s) reachable"));
    }

    let lost_terminals = count(FindingKind::UnreachableTerminal);
    if lost_terminals > 0 {
        out.push(format!(
            "Route at least one path to each of {lost_terminals} unreachable terminal(s)"
        ));
    }

    let ambiguous = count(FindingKind::AmbiguousBranch);
    if ambiguous > 0 {
        out.push(format!(
            "Make branch conditions mutually exclusive in {ambiguous} ambiguous group(s)"
        ));
    }

    let invalid = count(FindingKind::InvalidPredicate);
    if invalid > 0 {
        out.push(format!("Fix {invalid} ill-typed predicate(s)"));
    }

    let dead_ends = enumeration.dead_ends.len();
    if dead_ends > 0 {
        out.push(format!(
            "Add a fallthrough edge or widen conditions for {dead_ends} unrouted response(s)"
        ));
    }

    if enumeration.truncated {
        out.push(
            "Path enumeration was truncated; raise the enumeration limits for complete results"
                .to_string(),
        );
    }

    if gates.acyclic && topology.critical_path.is_empty() {
        out.push("Ensure the survey has a valid completion path".to_string());
    }

    if coverage.percentage < LOW_COVERAGE {
        out.push(format!(
            "Coverage is only {:.1}%; add more routing paths",
            coverage.percentage
        ));
    }

    if coverage.selected_paths.len() == 1 {
        out.push("Only one test path needed; the survey may be too linear".to_string());
    }

    if statistics.decision_points == 0 {
        out.push("No decision points found; add conditional routing".to_string());
    } else if statistics.decision_points > MANY_DECISION_POINTS {
        out.push("Many decision points; consider simplifying the survey logic".to_string());
    }

    out
}
