// src/config/model.rs

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Deserialize;

use crate::paths::EnumerationLimits;
use crate::types::ValidationMode;
use crate::validate::{FatalPolicy, FindingKind};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [validation]
/// mode = "tolerant"          # or "strict"
/// fatal = ["truncated"]      # extra finding kinds fatal in strict mode
///
/// [enumeration]
/// max_paths = 10000
/// max_depth = 500
/// time_budget = "30s"
/// workers = 1
/// ```
///
/// Every section and key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub validation: RawValidationSection,

    #[serde(default)]
    pub enumeration: RawEnumerationSection,
}

/// `[validation]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawValidationSection {
    /// `"tolerant"` (default) or `"strict"`.
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Finding kinds (snake_case) that are fatal in strict mode even when
    /// they are not errors, e.g. `"truncated"` or `"dead_end"`.
    #[serde(default)]
    pub fatal: Vec<String>,
}

fn default_mode() -> String {
    "tolerant".to_string()
}

impl Default for RawValidationSection {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            fatal: Vec::new(),
        }
    }
}

/// `[enumeration]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawEnumerationSection {
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,

    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Wall-clock budget such as `"500ms"`, `"30s"` or `"2m"`.
    #[serde(default)]
    pub time_budget: Option<String>,

    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_max_paths() -> usize {
    EnumerationLimits::DEFAULT_MAX_PATHS
}

fn default_workers() -> usize {
    1
}

impl Default for RawEnumerationSection {
    fn default() -> Self {
        Self {
            max_paths: default_max_paths(),
            max_depth: None,
            time_budget: None,
            workers: default_workers(),
        }
    }
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// [`ConfigFile::default`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFile {
    pub validation: ValidationConfig,
    pub enumeration: EnumerationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationConfig {
    pub mode: ValidationMode,
    pub fatal: BTreeSet<FindingKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationConfig {
    pub max_paths: usize,
    pub max_depth: Option<usize>,
    pub time_budget: Option<Duration>,
    pub workers: usize,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self {
            max_paths: default_max_paths(),
            max_depth: None,
            time_budget: None,
            workers: default_workers(),
        }
    }
}

impl ConfigFile {
    pub(crate) fn new_unchecked(validation: ValidationConfig, enumeration: EnumerationConfig) -> Self {
        Self {
            validation,
            enumeration,
        }
    }

    pub fn policy(&self) -> FatalPolicy {
        FatalPolicy {
            mode: self.validation.mode,
            extra_fatal: self.validation.fatal.clone(),
        }
    }

    pub fn limits(&self) -> EnumerationLimits {
        EnumerationLimits {
            max_paths: self.enumeration.max_paths,
            max_depth: self.enumeration.max_depth,
            time_budget: self.enumeration.time_budget,
        }
    }
}
