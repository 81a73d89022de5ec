// src/document/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::document::model::SurveyDocument;
use crate::errors::Result;

/// Read and deserialize a survey document. Only JSON shape is checked here;
/// id references are resolved by [`crate::document::build_graph`].
pub fn load_document(path: impl AsRef<Path>) -> Result<SurveyDocument> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let document = parse_document(&contents)?;
    debug!(
        path = %path.display(),
        nodes = document.survey_dag.graph.nodes.len(),
        edges = document.survey_dag.graph.edges.len(),
        "survey document loaded"
    );
    Ok(document)
}

pub fn parse_document(contents: &str) -> Result<SurveyDocument> {
    Ok(serde_json::from_str(contents)?)
}

/// Write `value` as pretty JSON with a trailing newline.
pub fn write_json<T: serde::Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}
