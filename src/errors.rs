// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::validate::Finding;

#[derive(Error, Debug)]
pub enum SurveyDagError {
    /// An id reference in the input does not resolve; the graph cannot be
    /// built.
    #[error("Malformed graph: {0}")]
    MalformedGraph(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Strict mode stopped at the first fatal finding.
    #[error("Strict validation failed: {0}")]
    StrictViolation(Finding),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SurveyDagError>;
