mod common;

use std::time::Duration;

use common::{edge_seq, node_seq, strings};
use surveydag::paths::{
    DeadEndReason, EnumerationLimits, PathEnumerator, ReplayError, TruncationReason, replay,
};
use surveydag::predicate::{Assignment, CmpOp, Predicate, Value};
use surveydag_test_utils::builders::SurveyBuilder;
use surveydag_test_utils::{fixtures, init_tracing};

fn assign(pairs: &[(&str, Value)]) -> Assignment {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_linear_survey_has_one_path() {
    init_tracing();
    let graph = fixtures::linear();
    let result = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate();

    assert!(result.is_complete());
    assert_eq!(result.paths.len(), 1);
    let path = &result.paths[0];
    assert_eq!(node_seq(&graph, path), strings(&["Q1", "Q2", "END"]));
    assert_eq!(edge_seq(&graph, path), strings(&["E1", "E2"]));
    assert_eq!(
        path.assignment,
        assign(&[("Q1", Value::Int(1)), ("Q2", Value::Int(1))])
    );
}

#[test]
fn test_branches_follow_priority_order() {
    let graph = fixtures::branching();
    let result = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate();

    assert!(result.is_complete());
    assert!(result.dead_ends.is_empty());
    let routes: Vec<Vec<String>> = result.paths.iter().map(|p| node_seq(&graph, p)).collect();
    assert_eq!(
        routes,
        vec![strings(&["Q1", "Q2", "END"]), strings(&["Q1", "Q3", "END"])]
    );
    // First response in domain order selecting each edge.
    assert_eq!(result.paths[0].assignment.get("Q1"), Some(&Value::Int(1)));
    assert_eq!(result.paths[1].assignment.get("Q1"), Some(&Value::Int(2)));
}

#[test]
fn test_enumeration_is_restartable_and_lazy() {
    let graph = fixtures::diamonds(10);
    let enumerator = PathEnumerator::new(&graph, EnumerationLimits::default());

    let first: Vec<_> = enumerator.paths().take(3).collect();
    let again: Vec<_> = enumerator.paths().take(3).collect();
    assert_eq!(first.len(), 3);
    assert_eq!(first, again);
}

#[test]
fn test_hidden_question_records_no_response() {
    let graph = fixtures::hidden_question();
    let result = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate();

    assert!(result.is_complete());
    assert!(result.dead_ends.is_empty(), "{:?}", result.dead_ends);
    let routes: Vec<(Vec<String>, Vec<String>)> = result
        .paths
        .iter()
        .map(|p| (node_seq(&graph, p), edge_seq(&graph, p)))
        .collect();
    assert_eq!(
        routes,
        vec![
            (strings(&["Q1", "Q2", "ALT"]), strings(&["E1", "E2"])),
            (strings(&["Q1", "Q2", "END"]), strings(&["E1", "E3"])),
            (strings(&["Q1", "Q2", "END"]), strings(&["E1b", "E3"])),
        ]
    );
    assert_eq!(result.paths[2].assignment, assign(&[("Q1", Value::Int(2))]));
}

#[test]
fn test_max_paths_truncates_and_says_so() {
    let graph = fixtures::diamonds(3);

    let limited = PathEnumerator::new(&graph, EnumerationLimits::default().with_max_paths(3)).enumerate();
    assert_eq!(limited.paths.len(), 3);
    assert_eq!(limited.truncated, vec![TruncationReason::MaxPaths]);
    assert!(!limited.is_complete());

    // Exactly as many paths as allowed is still complete.
    let exact = PathEnumerator::new(&graph, EnumerationLimits::default().with_max_paths(8)).enumerate();
    assert_eq!(exact.paths.len(), 8);
    assert!(exact.is_complete());
}

#[test]
fn test_truncated_prefix_matches_full_run() {
    let graph = fixtures::diamonds(4);
    let full = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate();
    let part = PathEnumerator::new(&graph, EnumerationLimits::default().with_max_paths(5)).enumerate();
    assert_eq!(full.paths.len(), 16);
    assert_eq!(part.paths[..], full.paths[..5]);
}

#[test]
fn test_max_depth_truncates() {
    let graph = fixtures::linear();
    let result = PathEnumerator::new(&graph, EnumerationLimits::default().with_max_depth(1)).enumerate();
    assert!(result.paths.is_empty());
    assert_eq!(result.truncated, vec![TruncationReason::MaxDepth]);
}

#[test]
fn test_time_budget_truncates() {
    let graph = fixtures::diamonds(8);
    let limits = EnumerationLimits::default().with_time_budget(Duration::ZERO);
    let result = PathEnumerator::new(&graph, limits).enumerate();
    assert!(result.paths.len() < 256);
    assert_eq!(result.truncated, vec![TruncationReason::TimeBudget]);
}

#[test]
fn test_unrouted_responses_are_dead_ends() {
    let graph = SurveyBuilder::new()
        .question("Q1", &[1, 2, 3])
        .terminal("END")
        .start("Q1")
        .when("E1", "Q1", "END", "P_Q1_EQ_1", Predicate::eq("Q1", 1))
        .build();

    let result = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate();
    assert_eq!(result.paths.len(), 1);
    assert!(result.is_complete());

    let responses: Vec<Option<Value>> = result.dead_ends.iter().map(|d| d.response.clone()).collect();
    assert_eq!(responses, vec![Some(Value::Int(2)), Some(Value::Int(3))]);
    assert!(result.dead_ends.iter().all(|d| d.node == "Q1" && d.reason == DeadEndReason::NoRoute));
}

#[test]
fn test_evaluation_error_is_a_dead_end_not_a_crash() {
    // E1 reads Q2 before Q2 has been asked.
    let graph = SurveyBuilder::new()
        .question("Q1", &[1])
        .question("Q2", &[1])
        .terminal("END")
        .start("Q1")
        .when("E1", "Q1", "END", "P_Q2_EQ_1", Predicate::eq("Q2", 1))
        .fallthrough("E2", "Q1", "Q2")
        .always("E3", "Q2", "END")
        .build();

    let result = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate();
    assert!(result.paths.is_empty());
    assert_eq!(result.dead_ends.len(), 1);
    match &result.dead_ends[0].reason {
        DeadEndReason::Evaluation { edge, error } => {
            assert_eq!(edge, "E1");
            assert!(error.contains("Q2"));
        }
        other => panic!("Expected evaluation dead end, got {other:?}"),
    }
}

#[test]
fn test_runtime_ambiguity_is_recorded() {
    let graph = fixtures::ambiguous();
    let result = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate();

    assert_eq!(result.paths.len(), 2);
    assert_eq!(result.ambiguities.len(), 1);
    let ambiguity = &result.ambiguities[0];
    assert_eq!(ambiguity.node, "Q1");
    assert_eq!(ambiguity.edges, strings(&["E1", "E2"]));
    assert_eq!(ambiguity.response, Some(Value::Int(3)));
}

#[test]
fn test_cycles_become_dead_ends() {
    let graph = fixtures::cyclic();
    let result = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate();

    assert_eq!(result.paths.len(), 1);
    assert_eq!(node_seq(&graph, &result.paths[0]), strings(&["A", "B", "C", "END"]));
    assert!(result.dead_ends.iter().any(|d| d.reason
        == DeadEndReason::Cycle {
            edge: "E3".to_string(),
            target: "A".to_string(),
        }));
}

#[test]
fn test_numeric_domain_uses_threshold_neighbours() {
    let graph = SurveyBuilder::new()
        .numeric("AGE", Some(0.0), Some(120.0))
        .terminal("ADULT")
        .terminal("MINOR")
        .start("AGE")
        .when(
            "E1",
            "AGE",
            "ADULT",
            "P_AGE_GE_18",
            Predicate::compare(CmpOp::Ge, "AGE", 18),
        )
        .fallthrough("E2", "AGE", "MINOR")
        .build();

    let result = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate();
    let ages: Vec<Option<&Value>> = result.paths.iter().map(|p| p.assignment.get("AGE")).collect();
    assert_eq!(ages, vec![Some(&Value::Int(18)), Some(&Value::Int(0))]);
}

#[test]
fn test_text_domain_tries_constants_and_other() {
    let graph = SurveyBuilder::new()
        .text("Q1")
        .terminal("YES")
        .terminal("ELSE")
        .start("Q1")
        .when("E1", "Q1", "YES", "P_Q1_YES", Predicate::eq("Q1", "yes"))
        .fallthrough("E2", "Q1", "ELSE")
        .build();

    let result = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate();
    let answers: Vec<Option<&Value>> = result.paths.iter().map(|p| p.assignment.get("Q1")).collect();
    assert_eq!(
        answers,
        vec![Some(&Value::from("yes")), Some(&Value::from("__other__"))]
    );
}

#[test]
fn test_replay_reproduces_every_path() {
    for graph in [fixtures::branching(), fixtures::hidden_question(), fixtures::diamonds(3)] {
        let result = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate();
        for path in &result.paths {
            let walked = replay(&graph, &path.assignment).expect("replay succeeds");
            assert_eq!(walked.nodes, path.nodes);
            assert_eq!(walked.edges, path.edges);
        }
    }
}

#[test]
fn test_replay_reports_missing_route() {
    let graph = SurveyBuilder::new()
        .question("Q1", &[1, 2])
        .terminal("END")
        .start("Q1")
        .when("E1", "Q1", "END", "P_Q1_EQ_1", Predicate::eq("Q1", 1))
        .build();

    let err = replay(&graph, &assign(&[("Q1", Value::Int(2))])).expect_err("no route");
    assert_eq!(
        err,
        ReplayError::NoRoute {
            node: "Q1".to_string()
        }
    );
}

fn later_branch_on_earlier_answer(values: &[i64]) -> surveydag::graph::SurveyGraph {
    SurveyBuilder::new()
        .question("Q1", values)
        .question("Q2", &[1])
        .terminal("A")
        .terminal("B")
        .start("Q1")
        .always("E1", "Q1", "Q2")
        .when("E2", "Q2", "A", "P_Q1_EQ_1", Predicate::eq("Q1", 1))
        .when("E3", "Q2", "B", "P_Q1_NE_1", Predicate::compare(CmpOp::Ne, "Q1", 1))
        .build()
}

#[test]
fn test_answer_read_by_a_later_node_keeps_both_routes() {
    let graph = later_branch_on_earlier_answer(&[1, 2]);
    let result = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate();

    assert_eq!(result.paths.len(), 2);
    assert_eq!(node_seq(&graph, &result.paths[0]), strings(&["Q1", "Q2", "A"]));
    assert_eq!(node_seq(&graph, &result.paths[1]), strings(&["Q1", "Q2", "B"]));
    assert_eq!(result.paths[1].assignment.get("Q1"), Some(&Value::Int(2)));
    assert!(result.dead_ends.is_empty());

    let coverage = surveydag::coverage::solve(&graph, &result.paths);
    assert!(coverage.is_complete(), "uncovered: {:?}", coverage.uncovered);
}

#[test]
fn test_answers_routing_alike_are_merged() {
    // 2 and 3 both take E1 and both fail Q1 == 1 later on.
    let graph = later_branch_on_earlier_answer(&[1, 2, 3]);
    let result = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate();

    let answers: Vec<Option<&Value>> = result.paths.iter().map(|p| p.assignment.get("Q1")).collect();
    assert_eq!(answers, vec![Some(&Value::Int(1)), Some(&Value::Int(2))]);
}
