// src/engine/runtime.rs

//! Tokio shell around the enumerator.
//!
//! The search tree is split at the first node with several choices; every
//! subtree runs on a `spawn_blocking` worker. Workers share the graph and
//! the [`Budget`] counter and nothing else, and their results are merged in
//! subtree order so that an untruncated run matches the sequential one.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::engine::AnalysisOptions;
use crate::engine::core::finish;
use crate::errors::Result;
use crate::graph::SurveyGraph;
use crate::paths::{Budget, Enumeration, EnumerationLimits, Paths, Split, split_frontier};
use crate::report::AnalysisReport;
use crate::validate::validate;

/// Same pipeline as [`crate::engine::analyze`], with enumeration spread over
/// `options.workers` blocking workers.
pub async fn analyze_concurrent(
    graph: Arc<SurveyGraph>,
    options: AnalysisOptions,
) -> Result<AnalysisReport> {
    let validation = validate(&graph, &options.policy)?;
    let enumeration =
        enumerate_concurrent(Arc::clone(&graph), options.limits, options.workers).await?;
    finish(&graph, &options, &validation, &enumeration)
}

pub async fn enumerate_concurrent(
    graph: Arc<SurveyGraph>,
    limits: EnumerationLimits,
    workers: usize,
) -> Result<Enumeration> {
    let budget = Arc::new(Budget::new(limits));

    let (seeds, mut merged) = match split_frontier(&graph, &limits) {
        Split::Whole => {
            debug!("no branching prefix; enumerating on a single worker");
            let handle = tokio::task::spawn_blocking(move || {
                Paths::new(&graph, budget).collect_enumeration()
            });
            let enumeration = handle.await.context("enumeration worker panicked")?;
            return Ok(enumeration);
        }
        Split::Branches {
            seeds,
            dead_ends,
            ambiguities,
        } => (
            seeds,
            Enumeration {
                dead_ends,
                ambiguities,
                ..Enumeration::default()
            },
        ),
    };

    debug!(subtrees = seeds.len(), workers, "spawning enumeration workers");
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut handles: Vec<JoinHandle<Enumeration>> = Vec::with_capacity(seeds.len());

    for seed in seeds {
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .context("enumeration semaphore closed")?;
        let graph = Arc::clone(&graph);
        let budget = Arc::clone(&budget);
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            Paths::seeded(&graph, budget, seed).collect_enumeration()
        }));
    }

    for handle in handles {
        let part = handle.await.context("enumeration worker panicked")?;
        merged.merge(part);
    }
    merged.truncated = budget.truncation();

    Ok(merged)
}
