// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file and return the raw, unvalidated `RawConfigFile`.
///
/// Only TOML deserialization happens here. Use [`load_and_validate`] to also
/// check modes, finding kinds and limits.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;
    debug!(path = %path.display(), "loaded config file");

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load the config at `path` if it exists, otherwise start from defaults.
///
/// Used when no `--config` flag was given: a missing `surveydag.toml` is not
/// an error, an unreadable or invalid one is.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    if path.exists() {
        load_from_path(path)
    } else {
        debug!(path = %path.display(), "no config file; using defaults");
        Ok(RawConfigFile::default())
    }
}

/// `surveydag.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("surveydag.toml")
}
