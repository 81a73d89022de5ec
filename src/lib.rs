// src/lib.rs

pub mod cli;
pub mod config;
pub mod coverage;
pub mod document;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod paths;
pub mod predicate;
pub mod report;
pub mod types;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, RawConfigFile, default_config_path, load_from_path, load_or_default};
use crate::document::{build_graph, load_document, populate, write_json};
use crate::engine::{AnalysisOptions, analyze, analyze_concurrent};
use crate::graph::SurveyGraph;

/// High-level entry point used by `main.rs`.
///
/// Loads the document and config, builds the graph, runs the analysis and
/// writes either the populated document or the bare report.
pub async fn run(args: CliArgs) -> Result<()> {
    let mut document = load_document(&args.input)?;

    let raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => load_or_default(default_config_path())?,
    };
    let cfg = ConfigFile::try_from(apply_overrides(raw, &args))?;

    let graph = build_graph(&document.survey_dag)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        fingerprint = graph.fingerprint(),
        "survey graph built"
    );

    if args.dry_run {
        print_dry_run(&graph, &cfg);
        return Ok(());
    }

    let options = AnalysisOptions::from_config(&cfg);
    let report = if options.workers > 1 {
        analyze_concurrent(Arc::new(graph), options).await?
    } else {
        analyze(&graph, &options)?
    };
    for line in report.path_lines() {
        debug!("{line}");
    }

    if args.report_only {
        emit(args.output.as_deref(), &report)?;
    } else {
        populate(&mut document, &report)?;
        emit(args.output.as_deref(), &document)?;
    }
    Ok(())
}

/// Apply CLI flags on top of the file config. Flags win.
pub fn apply_overrides(mut raw: RawConfigFile, args: &CliArgs) -> RawConfigFile {
    if args.strict {
        raw.validation.mode = "strict".to_string();
    }
    if let Some(max_paths) = args.max_paths {
        raw.enumeration.max_paths = max_paths;
    }
    if args.max_depth.is_some() {
        raw.enumeration.max_depth = args.max_depth;
    }
    if args.time_budget.is_some() {
        raw.enumeration.time_budget = args.time_budget.clone();
    }
    if let Some(workers) = args.workers {
        raw.enumeration.workers = workers;
    }
    raw
}

fn emit<T: Serialize>(output: Option<&Path>, value: &T) -> Result<()> {
    match output {
        Some(path) => {
            write_json(path, value)?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

/// Dry-run output: graph shape and effective settings.
fn print_dry_run(graph: &SurveyGraph, cfg: &ConfigFile) {
    println!("surveydag dry-run");
    println!("  validation.mode = {}", cfg.validation.mode.as_str());
    if !cfg.validation.fatal.is_empty() {
        let fatal: Vec<&str> = cfg.validation.fatal.iter().map(|k| k.as_str()).collect();
        println!("  validation.fatal = {fatal:?}");
    }
    println!("  enumeration.max_paths = {}", cfg.enumeration.max_paths);
    if let Some(depth) = cfg.enumeration.max_depth {
        println!("  enumeration.max_depth = {depth}");
    }
    if let Some(budget) = cfg.enumeration.time_budget {
        println!("  enumeration.time_budget = {budget:?}");
    }
    println!("  enumeration.workers = {}", cfg.enumeration.workers);
    println!();

    println!("graph {}", graph.fingerprint());
    println!("  start: {}", graph.node_id(graph.start()));
    let terminals: Vec<&str> = graph.terminals().iter().map(|&t| graph.node_id(t)).collect();
    println!("  terminals: {terminals:?}");
    println!();

    println!("nodes ({}):", graph.node_count());
    for node in graph.node_indices() {
        let data = graph.node(node);
        println!("  - {} [{}]", data.id, data.kind.as_str());
        for &edge in graph.outgoing(node) {
            let e = graph.edge(edge);
            let when = e.condition.predicate_id().unwrap_or("always");
            println!(
                "      {} -> {} ({}, priority {}, when {when})",
                e.id,
                graph.node_id(graph.target(edge)),
                e.kind.as_str(),
                e.priority,
            );
        }
    }

    println!();
    println!("predicates:");
    for def in graph.predicates() {
        println!("  - {}: {}", def.id, def.predicate);
    }

    debug!("dry-run complete (no analysis)");
}
