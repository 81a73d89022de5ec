#![allow(dead_code)]

use surveydag::engine::{AnalysisOptions, analyze};
use surveydag::graph::SurveyGraph;
use surveydag::paths::Path;
use surveydag::report::AnalysisReport;
use surveydag::validate::{Finding, FindingKind};

/// Tolerant analysis with default limits.
pub fn analyze_default(graph: &SurveyGraph) -> AnalysisReport {
    analyze(graph, &AnalysisOptions::default()).expect("tolerant analysis never fails")
}

pub fn kinds(findings: &[Finding]) -> Vec<FindingKind> {
    findings.iter().map(|f| f.kind).collect()
}

pub fn node_seq(graph: &SurveyGraph, path: &Path) -> Vec<String> {
    path.node_ids(graph).into_iter().map(str::to_string).collect()
}

pub fn edge_seq(graph: &SurveyGraph, path: &Path) -> Vec<String> {
    path.edge_ids(graph).into_iter().map(str::to_string).collect()
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
