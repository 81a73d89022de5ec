mod common;

use std::fs;
use std::time::Duration;

use clap::Parser;
use surveydag::cli::CliArgs;
use surveydag::config::{
    ConfigFile, RawConfigFile, load_and_validate, load_from_path, load_or_default, parse_duration,
};
use surveydag::document::{build_graph, load_document, parse_document, populate, write_json};
use surveydag::engine::{AnalysisOptions, analyze};
use surveydag::errors::SurveyDagError;
use surveydag::types::ValidationMode;
use surveydag::validate::FindingKind;
use surveydag_test_utils::fixtures::BRANCHING_JSON;
use surveydag_test_utils::{init_tracing, with_timeout};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

fn path_str(path: &std::path::Path) -> &str {
    path.to_str().expect("temp paths are utf-8")
}

fn config_error(contents: &str) -> String {
    let dir = TempDir::new().expect("tempdir");
    let path = write(&dir, "surveydag.toml", contents);
    match load_and_validate(&path) {
        Err(SurveyDagError::ConfigError(msg)) => msg,
        Err(e) => panic!("Expected ConfigError, got: {e:?}"),
        Ok(cfg) => panic!("Expected error, got Ok: {cfg:?}"),
    }
}

#[test]
fn test_document_round_trip_through_disk() {
    init_tracing();
    let dir = TempDir::new().expect("tempdir");
    let input = write(&dir, "survey.json", BRANCHING_JSON);

    let mut document = load_document(&input).expect("loads");
    let graph = build_graph(&document.survey_dag).expect("builds");
    let report = analyze(&graph, &AnalysisOptions::default()).expect("tolerant");
    populate(&mut document, &report).expect("populates");

    let output = dir.path().join("out.json");
    write_json(&output, &document).expect("writes");
    let text = fs::read_to_string(&output).expect("reads back");
    assert!(text.ends_with('\n'));

    let reloaded = parse_document(&text).expect("output is a valid document");
    assert_eq!(reloaded.survey_dag.metadata["version"], serde_json::json!(3));
    assert!(reloaded.survey_dag.validation.is_some());
    assert!(reloaded.survey_dag.analysis.is_some());

    // Analysing the populated document gives the same graph.
    let again = build_graph(&reloaded.survey_dag).expect("builds");
    assert_eq!(again.fingerprint(), graph.fingerprint());
}

#[test]
fn test_unknown_fields_survive_round_trip() {
    let json = BRANCHING_JSON.replacen(
        r#""id": "Q1", "type": "question","#,
        r#""id": "Q1", "type": "question", "label": "How often?","#,
        1,
    );
    let document = parse_document(&json).expect("parses");
    let value = serde_json::to_value(&document).expect("serializes");
    assert_eq!(
        value["survey_dag"]["graph"]["nodes"][0]["label"],
        serde_json::json!("How often?")
    );
}

#[test]
fn test_missing_document_is_io_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = load_document(dir.path().join("nope.json")).expect_err("missing file");
    assert!(matches!(err, SurveyDagError::IoError(_)), "{err:?}");
}

#[test]
fn test_invalid_json_is_json_error() {
    let err = parse_document("{ \"survey_dag\": ").expect_err("truncated json");
    assert!(matches!(err, SurveyDagError::JsonError(_)), "{err:?}");
}

#[test]
fn test_config_file_is_loaded() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        &dir,
        "surveydag.toml",
        r#"
[validation]
mode = "strict"
fatal = ["truncated", "dead_end"]

[enumeration]
max_paths = 50
max_depth = 20
time_budget = "250ms"
workers = 4
"#,
    );

    let cfg = load_and_validate(&path).expect("valid config");
    assert_eq!(cfg.validation.mode, ValidationMode::Strict);
    assert!(cfg.validation.fatal.contains(&FindingKind::Truncated));
    assert!(cfg.validation.fatal.contains(&FindingKind::DeadEnd));
    assert_eq!(cfg.enumeration.max_paths, 50);
    assert_eq!(cfg.enumeration.max_depth, Some(20));
    assert_eq!(cfg.enumeration.time_budget, Some(Duration::from_millis(250)));
    assert_eq!(cfg.enumeration.workers, 4);

    let options = AnalysisOptions::from_config(&cfg);
    assert_eq!(options.workers, 4);
    assert_eq!(options.limits.max_paths, 50);
    assert_eq!(options.policy.mode, ValidationMode::Strict);
}

#[test]
fn test_empty_config_means_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(&dir, "surveydag.toml", "");
    let cfg = load_and_validate(&path).expect("valid config");
    assert_eq!(cfg, ConfigFile::default());
}

#[test]
fn test_missing_default_config_means_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let raw = load_or_default(dir.path().join("surveydag.toml")).expect("defaults");
    assert_eq!(
        ConfigFile::try_from(raw).expect("valid"),
        ConfigFile::default()
    );
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = load_from_path(dir.path().join("missing.toml")).expect_err("missing");
    assert!(matches!(err, SurveyDagError::IoError(_)), "{err:?}");
}

#[test]
fn test_config_errors() {
    assert!(config_error("[validation]\nmode = \"lenient\"\n").contains("[validation].mode"));
    assert!(config_error("[validation]\nfatal = [\"bogus\"]\n").contains("unknown finding kind"));
    assert!(config_error("[enumeration]\nmax_paths = 0\n").contains("max_paths must be >= 1"));
    assert!(config_error("[enumeration]\nmax_depth = 0\n").contains("max_depth must be >= 1"));
    assert!(config_error("[enumeration]\nworkers = 0\n").contains("workers must be >= 1"));
    assert!(config_error("[enumeration]\ntime_budget = \"soon\"\n").contains("time_budget"));
}

#[test]
fn test_unknown_config_key_is_toml_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(&dir, "surveydag.toml", "[enumeration]\nmax_pathz = 3\n");
    let err = load_and_validate(&path).expect_err("unknown key");
    assert!(matches!(err, SurveyDagError::TomlError(_)), "{err:?}");
}

#[test]
fn test_parse_duration() {
    assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
    assert_eq!(parse_duration("30s"), Ok(Duration::from_secs(30)));
    assert_eq!(parse_duration(" 2m "), Ok(Duration::from_secs(120)));
    assert_eq!(parse_duration("7"), Ok(Duration::from_secs(7)));
    assert!(parse_duration("0s").is_err());
    assert!(parse_duration("1h").is_err());
    assert!(parse_duration("").is_err());
}

#[test]
fn test_cli_flags_override_config() {
    let mut raw = RawConfigFile::default();
    raw.enumeration.max_paths = 10;
    raw.enumeration.workers = 2;

    let args = CliArgs::parse_from([
        "surveydag",
        "-i",
        "survey.json",
        "--strict",
        "--max-paths",
        "5",
        "--time-budget",
        "1s",
    ]);
    let merged = surveydag::apply_overrides(raw, &args);
    assert_eq!(merged.validation.mode, "strict");
    assert_eq!(merged.enumeration.max_paths, 5);
    assert_eq!(merged.enumeration.time_budget.as_deref(), Some("1s"));
    // Not given on the command line.
    assert_eq!(merged.enumeration.workers, 2);
    assert_eq!(merged.enumeration.max_depth, None);
}

#[tokio::test]
async fn test_run_writes_populated_document() {
    init_tracing();
    let dir = TempDir::new().expect("tempdir");
    let input = write(&dir, "survey.json", BRANCHING_JSON);
    let config = write(&dir, "surveydag.toml", "[enumeration]\nworkers = 2\n");
    let output = dir.path().join("out.json");

    let args = CliArgs::parse_from([
        "surveydag",
        "-i",
        path_str(&input),
        "--config",
        path_str(&config),
        "-o",
        path_str(&output),
    ]);
    with_timeout(surveydag::run(args)).await.expect("run succeeds");

    let document = load_document(&output).expect("output loads");
    let validation = document.survey_dag.validation.expect("validation written");
    assert_eq!(validation["valid"], serde_json::json!(true));
    let analysis = document.survey_dag.analysis.expect("analysis written");
    assert_eq!(analysis["enumeration"]["total_paths"], serde_json::json!(2));
}

#[tokio::test]
async fn test_run_report_only_in_strict_mode_fails_on_cycle() {
    init_tracing();
    let dir = TempDir::new().expect("tempdir");
    let cyclic = BRANCHING_JSON.replacen(
        r#"{ "id": "E4", "source": "Q3", "target": "END" }"#,
        r#"{ "id": "E4", "source": "Q3", "target": "Q1" }"#,
        1,
    );
    let input = write(&dir, "survey.json", &cyclic);
    let config = write(&dir, "surveydag.toml", "");

    let args = CliArgs::parse_from([
        "surveydag",
        "-i",
        path_str(&input),
        "--config",
        path_str(&config),
        "--strict",
        "--report-only",
    ]);
    let err = with_timeout(surveydag::run(args)).await.expect_err("strict run fails");
    match err.downcast_ref::<SurveyDagError>() {
        Some(SurveyDagError::StrictViolation(f)) => assert_eq!(f.kind, FindingKind::CycleDetected),
        other => panic!("Expected StrictViolation, got: {other:?}"),
    }
}
