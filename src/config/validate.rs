// src/config/validate.rs

use std::collections::BTreeSet;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

use crate::config::model::{
    ConfigFile, EnumerationConfig, RawConfigFile, RawEnumerationSection, RawValidationSection,
    ValidationConfig,
};
use crate::errors::{Result, SurveyDagError};
use crate::types::ValidationMode;
use crate::validate::FindingKind;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::SurveyDagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let validation = validate_validation_section(&raw.validation)?;
        let enumeration = validate_enumeration_section(&raw.enumeration)?;
        Ok(ConfigFile::new_unchecked(validation, enumeration))
    }
}

/// Validate a raw config without keeping the result.
pub fn validate_config(raw: &RawConfigFile) -> Result<()> {
    ConfigFile::try_from(raw.clone()).map(|_| ())
}

fn validate_validation_section(raw: &RawValidationSection) -> Result<ValidationConfig> {
    let mode: ValidationMode = raw
        .mode
        .parse()
        .map_err(|e: String| SurveyDagError::ConfigError(format!("[validation].mode: {e}")))?;

    let mut fatal = BTreeSet::new();
    for name in &raw.fatal {
        let kind: FindingKind = name
            .parse()
            .map_err(|e: String| SurveyDagError::ConfigError(format!("[validation].fatal: {e}")))?;
        fatal.insert(kind);
    }

    Ok(ValidationConfig { mode, fatal })
}

fn validate_enumeration_section(raw: &RawEnumerationSection) -> Result<EnumerationConfig> {
    if raw.max_paths == 0 {
        return Err(SurveyDagError::ConfigError(
            "[enumeration].max_paths must be >= 1 (got 0)".to_string(),
        ));
    }
    if raw.max_depth == Some(0) {
        return Err(SurveyDagError::ConfigError(
            "[enumeration].max_depth must be >= 1 (got 0)".to_string(),
        ));
    }
    if raw.workers == 0 {
        return Err(SurveyDagError::ConfigError(
            "[enumeration].workers must be >= 1 (got 0)".to_string(),
        ));
    }

    let time_budget = match &raw.time_budget {
        Some(text) => Some(parse_duration(text).map_err(|e| {
            SurveyDagError::ConfigError(format!("[enumeration].time_budget: {e}"))
        })?),
        None => None,
    };

    Ok(EnumerationConfig {
        max_paths: raw.max_paths,
        max_depth: raw.max_depth,
        time_budget,
        workers: raw.workers,
    })
}

fn duration_regex() -> &'static std::result::Result<Regex, regex::Error> {
    static RE: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*(ms|s|m)?\s*$"))
}

/// Parse `"250ms"`, `"30s"`, `"2m"`; a bare number means seconds.
pub fn parse_duration(text: &str) -> std::result::Result<Duration, String> {
    let re = match duration_regex() {
        Ok(re) => re,
        Err(e) => return Err(format!("duration pattern failed to compile: {e}")),
    };
    let caps = re
        .captures(text)
        .ok_or_else(|| format!("invalid duration '{text}' (expected e.g. 500ms, 30s, 2m)"))?;
    let amount: u64 = caps[1]
        .parse()
        .map_err(|_| format!("duration '{text}' is out of range"))?;
    let duration = match caps.get(2).map(|m| m.as_str()) {
        Some("ms") => Duration::from_millis(amount),
        Some("m") => Duration::from_secs(amount.saturating_mul(60)),
        _ => Duration::from_secs(amount),
    };
    if duration.is_zero() {
        return Err(format!("duration '{text}' must be greater than zero"));
    }
    Ok(duration)
}
