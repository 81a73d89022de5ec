use surveydag::cli::LogLevel;
use surveydag::logging::resolve_filter;

#[test]
fn test_cli_level_wins_over_env() {
    let filter = resolve_filter(Some(LogLevel::Debug), Some("trace"));
    assert_eq!(filter.to_string(), "debug");
}

#[test]
fn test_env_directives_are_used() {
    let filter = resolve_filter(None, Some("surveydag::paths=trace"));
    assert_eq!(filter.to_string(), "surveydag::paths=trace");
}

#[test]
fn test_missing_or_bad_env_falls_back_to_info() {
    assert_eq!(resolve_filter(None, None).to_string(), "info");
    assert_eq!(resolve_filter(None, Some("  ")).to_string(), "info");
    assert_eq!(resolve_filter(None, Some("surveydag=loud")).to_string(), "info");
}
