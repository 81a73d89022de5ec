// src/engine/core.rs

//! Synchronous analysis pipeline.
//!
//! No tokio types and no IO: a [`SurveyGraph`] and [`AnalysisOptions`] go in,
//! an [`AnalysisReport`] (or the strict-mode violation) comes out. The same
//! input and limits always yield the same report.

use tracing::{info, warn};

use crate::coverage::solve;
use crate::engine::AnalysisOptions;
use crate::errors::{Result, SurveyDagError};
use crate::graph::SurveyGraph;
use crate::paths::{Enumeration, PathEnumerator};
use crate::report::{AnalysisReport, analysis_findings, build_report};
use crate::validate::{Severity, ValidationReport, validate};

/// Run the whole pipeline sequentially.
pub fn analyze(graph: &SurveyGraph, options: &AnalysisOptions) -> Result<AnalysisReport> {
    let validation = validate(graph, &options.policy)?;
    let enumeration = PathEnumerator::new(graph, options.limits).enumerate();
    finish(graph, options, &validation, &enumeration)
}

/// Solve coverage over `enumeration` and assemble the report.
///
/// In strict mode the findings raised after validation (truncation, dead
/// ends, runtime ambiguity, incomplete coverage) are subject to the same
/// fatal policy as the structural ones.
pub(crate) fn finish(
    graph: &SurveyGraph,
    options: &AnalysisOptions,
    validation: &ValidationReport,
    enumeration: &Enumeration,
) -> Result<AnalysisReport> {
    let coverage = solve(graph, &enumeration.paths);

    let late = analysis_findings(validation, enumeration, &coverage);
    if let Some(fatal) = options.policy.first_fatal(&late) {
        warn!(finding = %fatal, "strict analysis stopped");
        return Err(SurveyDagError::StrictViolation(fatal.clone()));
    }
    for finding in late.iter().filter(|f| f.severity != Severity::Info) {
        warn!(kind = %finding.kind, "{}", finding.message);
    }

    let report = build_report(graph, options.policy.mode, validation, enumeration, &coverage);
    info!(
        valid = report.summary.valid,
        paths = report.enumeration.total_paths,
        selected = report.coverage.selected_paths.len(),
        coverage = report.summary.coverage_percentage,
        "analysis complete"
    );
    Ok(report)
}
