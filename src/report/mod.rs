// src/report/mod.rs

//! Assembly of the final analysis report.
//!
//! The report is a pure fold of validation findings, enumeration
//! diagnostics and the covering set. It carries no timestamps and only
//! ordered collections, so identical input and budget serialize to
//! byte-identical JSON.

pub mod recommend;
pub mod stats;

use serde::Serialize;

use crate::coverage::{Coverage, ElementCover};
use crate::graph::SurveyGraph;
use crate::paths::{DeadEnd, Enumeration, PathRecord, RuntimeAmbiguity, TruncationReason};
use crate::predicate::analysis::{Complexity, complexity, free_variables};
use crate::predicate::render_assignment;
use crate::types::ValidationMode;
use crate::validate::{Finding, FindingKind, Gates, Severity, ValidationReport, sort_findings};

pub use recommend::recommendations;
pub use stats::{Statistics, Topology};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summary: Summary,
    pub gates: Gates,
    pub findings: Vec<Finding>,
    pub statistics: Statistics,
    pub topology: Topology,
    pub predicates: Vec<PredicateSummary>,
    pub enumeration: EnumerationSummary,
    pub coverage: CoverageSummary,
    /// Guidance derived from everything above, in a fixed rule order.
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub graph_fingerprint: String,
    pub start: String,
    pub mode: ValidationMode,
    pub node_count: usize,
    pub edge_count: usize,
    /// All gates passed and no error-severity finding.
    pub valid: bool,
    pub coverage_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredicateSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub rendered: String,
    pub depends_on: Vec<String>,
    pub complexity: Complexity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumerationSummary {
    pub total_paths: usize,
    pub truncated: bool,
    pub truncation_reasons: Vec<TruncationReason>,
    pub dead_ends: Vec<DeadEnd>,
    pub runtime_ambiguities: Vec<RuntimeAmbiguity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub method: &'static str,
    pub selected_paths: Vec<PathRecord>,
    pub nodes: Vec<ElementCover>,
    pub edges: Vec<ElementCover>,
    pub uncovered: Vec<String>,
    pub covered_elements: usize,
    pub total_elements: usize,
    pub percentage: f64,
    pub complete: bool,
}

/// Findings produced after validation: truncation, dead ends, ambiguity
/// observed at runtime and incomplete coverage.
pub fn analysis_findings(
    validation: &ValidationReport,
    enumeration: &Enumeration,
    coverage: &Coverage,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    if !enumeration.is_complete() {
        let reasons: Vec<String> = enumeration
            .truncated
            .iter()
            .map(|r| r.as_str().to_string())
            .collect();
        findings.push(Finding::new(
            FindingKind::Truncated,
            reasons.clone(),
            format!(
                "path enumeration stopped early ({}); {} path(s) found, results are incomplete",
                reasons.join(", "),
                enumeration.paths.len()
            ),
        ));
    }

    for dead_end in &enumeration.dead_ends {
        findings.push(Finding::new(
            FindingKind::DeadEnd,
            vec![dead_end.node.clone()],
            dead_end.describe(),
        ));
    }

    for ambiguity in &enumeration.ambiguities {
        let mut edges = ambiguity.edges.clone();
        edges.sort();
        let already_reported = validation
            .of_kind(FindingKind::AmbiguousBranch)
            .any(|f| edges.iter().all(|e| f.involves(e)));
        if already_reported {
            continue;
        }
        let response = match &ambiguity.response {
            Some(v) => format!("response {v}"),
            None => "no response".to_string(),
        };
        let message = format!(
            "node '{}' has edges {} firing together for {response} (observed at runtime)",
            ambiguity.node,
            edges.join(", ")
        );
        if !findings
            .iter()
            .any(|f: &Finding| f.kind == FindingKind::AmbiguousBranch && f.ids == edges)
        {
            findings.push(Finding::new(FindingKind::AmbiguousBranch, edges, message));
        }
    }

    if !coverage.is_complete() {
        findings.push(Finding::new(
            FindingKind::IncompleteCoverage,
            coverage.uncovered.clone(),
            format!(
                "{} of {} elements not covered by any path: {}",
                coverage.uncovered.len(),
                coverage.total_elements,
                coverage.uncovered.join(", ")
            ),
        ));
    }

    findings
}

pub fn build_report(
    graph: &SurveyGraph,
    mode: ValidationMode,
    validation: &ValidationReport,
    enumeration: &Enumeration,
    coverage: &Coverage,
) -> AnalysisReport {
    let mut findings = validation.findings.clone();
    findings.extend(analysis_findings(validation, enumeration, coverage));
    sort_findings(&mut findings);

    let percentage = stats::round2(coverage.percentage());
    let valid = validation.gates.all_passed()
        && !findings.iter().any(|f| f.severity == Severity::Error);

    let predicates = graph
        .predicates()
        .map(|def| PredicateSummary {
            id: def.id.clone(),
            text: def.text.clone(),
            rendered: def.predicate.to_string(),
            depends_on: free_variables(&def.predicate).into_iter().collect(),
            complexity: complexity(&def.predicate),
        })
        .collect();

    let selected_paths = coverage
        .selected
        .iter()
        .map(|&i| enumeration.paths[i].record(graph, i))
        .collect();

    let mut report = AnalysisReport {
        summary: Summary {
            graph_fingerprint: graph.fingerprint().to_string(),
            start: graph.node_id(graph.start()).to_string(),
            mode,
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            valid,
            coverage_percentage: percentage,
        },
        gates: validation.gates,
        findings,
        statistics: stats::statistics(graph),
        topology: stats::topology(graph),
        predicates,
        enumeration: EnumerationSummary {
            total_paths: enumeration.paths.len(),
            truncated: !enumeration.is_complete(),
            truncation_reasons: enumeration.truncated.clone(),
            dead_ends: enumeration.dead_ends.clone(),
            runtime_ambiguities: enumeration.ambiguities.clone(),
        },
        coverage: CoverageSummary {
            method: "greedy_set_cover",
            selected_paths,
            nodes: coverage.nodes.clone(),
            edges: coverage.edges.clone(),
            uncovered: coverage.uncovered.clone(),
            covered_elements: coverage.covered_elements,
            total_elements: coverage.total_elements,
            percentage,
            complete: coverage.is_complete(),
        },
        recommendations: Vec::new(),
    };
    report.recommendations = recommendations(
        &report.gates,
        &report.findings,
        &report.statistics,
        &report.topology,
        &report.enumeration,
        &report.coverage,
    );
    report
}

impl AnalysisReport {
    pub fn has(&self, kind: FindingKind) -> bool {
        self.findings.iter().any(|f| f.kind == kind)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// One line per selected path, for logs and dry runs.
    pub fn path_lines(&self) -> Vec<String> {
        self.coverage
            .selected_paths
            .iter()
            .map(|p| {
                format!(
                    "{}: {} {}",
                    p.id,
                    p.nodes.join(" -> "),
                    render_assignment(&p.assignment)
                )
            })
            .collect()
    }
}
