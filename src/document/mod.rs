// src/document/mod.rs

//! The survey document: serde model, conversion into a [`SurveyGraph`] and
//! write-back of analysis results.
//!
//! [`SurveyGraph`]: crate::graph::SurveyGraph

pub mod convert;
pub mod loader;
pub mod model;

use serde_json::json;

use crate::errors::Result;
use crate::report::AnalysisReport;

pub use convert::build_graph;
pub use loader::{load_document, parse_document, write_json};
pub use model::{EdgeEntry, GraphSection, NodeEntry, PredicateEntry, SurveyDag, SurveyDocument};

/// Fill the `validation` and `analysis` sections from a report.
pub fn populate(document: &mut SurveyDocument, report: &AnalysisReport) -> Result<()> {
    let dag = &mut document.survey_dag;
    dag.validation = Some(json!({
        "valid": report.summary.valid,
        "mode": report.summary.mode.as_str(),
        "gates": serde_json::to_value(report.gates)?,
        "findings": serde_json::to_value(&report.findings)?,
    }));
    dag.analysis = Some(json!({
        "graph_fingerprint": report.summary.graph_fingerprint,
        "statistics": serde_json::to_value(&report.statistics)?,
        "topology": serde_json::to_value(&report.topology)?,
        "predicates": serde_json::to_value(&report.predicates)?,
        "enumeration": serde_json::to_value(&report.enumeration)?,
        "coverage": serde_json::to_value(&report.coverage)?,
        "recommendations": report.recommendations,
    }));
    Ok(())
}
