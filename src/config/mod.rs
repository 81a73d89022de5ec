// src/config/mod.rs

//! Configuration loading and validation for surveydag.
//!
//! - TOML-backed data model (`model.rs`).
//! - Loading from disk (`loader.rs`).
//! - Validation of modes, finding kinds and limits (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, EnumerationConfig, RawConfigFile, ValidationConfig};
pub use validate::{parse_duration, validate_config};
