// src/engine/mod.rs

//! Analysis pipeline: validate, enumerate, cover, report.
//!
//! The pure synchronous pipeline lives in [`core`]; [`runtime`] is the tokio
//! shell that spreads path enumeration over blocking workers.

pub mod core;
pub mod runtime;

use crate::config::ConfigFile;
use crate::paths::EnumerationLimits;
use crate::validate::FatalPolicy;

/// Options shared by the sequential and the concurrent pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub policy: FatalPolicy,
    pub limits: EnumerationLimits,
    /// Enumeration workers; `1` runs the sequential enumerator.
    pub workers: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            policy: FatalPolicy::tolerant(),
            limits: EnumerationLimits::default(),
            workers: 1,
        }
    }
}

impl AnalysisOptions {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            policy: cfg.policy(),
            limits: cfg.limits(),
            workers: cfg.enumeration.workers,
        }
    }

    pub fn with_policy(mut self, policy: FatalPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_limits(mut self, limits: EnumerationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

pub use core::analyze;
pub use runtime::{analyze_concurrent, enumerate_concurrent};
