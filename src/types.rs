// src/types.rs

use std::str::FromStr;

use serde::Serialize;

/// How validation findings affect the pipeline.
///
/// - `Tolerant`: findings are collected and reported; a report is always
///   produced (default).
/// - `Strict`: the pipeline stops at the first fatal finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    #[default]
    Tolerant,
    Strict,
}

impl ValidationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationMode::Tolerant => "tolerant",
            ValidationMode::Strict => "strict",
        }
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tolerant" => Ok(ValidationMode::Tolerant),
            "strict" => Ok(ValidationMode::Strict),
            other => Err(format!(
                "invalid validation mode: {other} (expected \"tolerant\" or \"strict\")"
            )),
        }
    }
}
