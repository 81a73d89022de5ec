mod common;

use common::{kinds, strings};
use surveydag::errors::SurveyDagError;
use surveydag::predicate::{CmpOp, Predicate};
use surveydag::validate::{FatalPolicy, FindingKind, Severity, validate};
use surveydag_test_utils::builders::SurveyBuilder;
use surveydag_test_utils::{fixtures, init_tracing};

#[test]
fn test_clean_graph_has_no_findings() {
    init_tracing();
    let report = validate(&fixtures::branching(), &FatalPolicy::tolerant()).expect("tolerant");
    assert!(report.findings.is_empty(), "unexpected: {:?}", report.findings);
    assert!(report.gates.all_passed());
}

#[test]
fn test_orphan_node_is_reported() {
    let report = validate(&fixtures::with_orphan(), &FatalPolicy::tolerant()).expect("tolerant");

    assert_eq!(kinds(&report.findings), vec![FindingKind::OrphanNode]);
    let orphan = &report.findings[0];
    assert_eq!(orphan.ids, strings(&["Q9"]));
    assert_eq!(orphan.severity, Severity::Error);
    assert!(orphan.message.contains("no incoming edges"));
    assert!(!report.gates.all_reachable);
    assert!(report.gates.terminals_reachable);
}

#[test]
fn test_unreachable_terminal_is_reported() {
    let report =
        validate(&fixtures::unreachable_terminal(), &FatalPolicy::tolerant()).expect("tolerant");

    assert!(report.has(FindingKind::UnreachableTerminal));
    let finding = report
        .of_kind(FindingKind::UnreachableTerminal)
        .next()
        .expect("one finding");
    assert_eq!(finding.ids, strings(&["R2a"]));
    assert!(!report.gates.terminals_reachable);
}

#[test]
fn test_cycle_is_reported_with_its_nodes() {
    let report = validate(&fixtures::cyclic(), &FatalPolicy::tolerant()).expect("tolerant");

    let cycle = report
        .of_kind(FindingKind::CycleDetected)
        .next()
        .expect("cycle finding");
    assert_eq!(cycle.message, "cycle detected: A -> B -> C -> A");
    assert!(cycle.involves("C"));
    assert!(!report.gates.acyclic);

    // The back edge also lands on start.
    let incoming = report
        .of_kind(FindingKind::StartHasIncoming)
        .next()
        .expect("start has incoming");
    assert_eq!(incoming.ids, strings(&["A", "E3"]));
    assert!(!report.gates.single_start);
}

#[test]
fn test_overlapping_branches_are_ambiguous() {
    let report = validate(&fixtures::ambiguous(), &FatalPolicy::tolerant()).expect("tolerant");

    assert_eq!(kinds(&report.findings), vec![FindingKind::AmbiguousBranch]);
    let finding = &report.findings[0];
    assert_eq!(finding.ids, strings(&["E1", "E2"]));
    assert!(finding.message.contains("{Q1=3}"), "got {}", finding.message);
}

#[test]
fn test_always_false_edge_is_not_followed() {
    let graph = SurveyBuilder::new()
        .question("Q1", &[1, 2])
        .question("Q2", &[1])
        .terminal("END")
        .start("Q1")
        .when("E1", "Q1", "Q2", "P_Q1_EQ_9", Predicate::eq("Q1", 9))
        .fallthrough("E2", "Q1", "END")
        .always("E3", "Q2", "END")
        .build();

    let report = validate(&graph, &FatalPolicy::tolerant()).expect("tolerant");
    let orphan = report
        .of_kind(FindingKind::OrphanNode)
        .next()
        .expect("Q2 is unreachable");
    assert_eq!(orphan.ids, strings(&["Q2"]));
    assert!(orphan.message.contains("none of its incoming edges"));
}

#[test]
fn test_local_flow_warnings() {
    let graph = SurveyBuilder::new()
        .question("Q1", &[1])
        .question("Q2", &[1])
        .terminal("END")
        .start("Q1")
        .always("E1", "Q1", "END")
        .always("E2", "END", "Q2")
        .build();

    let report = validate(&graph, &FatalPolicy::tolerant()).expect("tolerant");
    assert_eq!(
        kinds(&report.findings),
        vec![FindingKind::DeadEndNode, FindingKind::TerminalHasOutgoing]
    );
    assert!(report.findings.iter().all(|f| f.severity == Severity::Warning));
    assert!(report.gates.all_passed());
}

#[test]
fn test_start_is_terminal() {
    let graph = SurveyBuilder::new()
        .terminal("END")
        .question("Q1", &[1])
        .start("END")
        .always("E1", "Q1", "END")
        .build();
    let report = validate(&graph, &FatalPolicy::tolerant()).expect("tolerant");
    assert!(report.has(FindingKind::StartIsTerminal));
}

#[test]
fn test_predicate_table_checks() {
    let graph = SurveyBuilder::new()
        .question("Q1", &[1, 2])
        .terminal("END")
        .start("Q1")
        .when(
            "E1",
            "Q1",
            "END",
            "P_BAD",
            Predicate::compare(CmpOp::Gt, "Q1", "five"),
        )
        .fallthrough("E2", "Q1", "END")
        .predicate("P_SPARE", Predicate::eq("Q1", 2))
        .build();

    let report = validate(&graph, &FatalPolicy::tolerant()).expect("tolerant");
    let invalid = report
        .of_kind(FindingKind::InvalidPredicate)
        .next()
        .expect("ill-typed predicate");
    assert_eq!(invalid.ids, strings(&["P_BAD"]));
    assert!(!report.gates.predicates_valid);

    let unused = report
        .of_kind(FindingKind::UnusedPredicate)
        .next()
        .expect("unused predicate");
    assert_eq!(unused.ids, strings(&["P_SPARE"]));
    assert_eq!(unused.severity, Severity::Info);
}

#[test]
fn test_findings_are_sorted_by_kind() {
    let report = validate(&fixtures::cyclic(), &FatalPolicy::tolerant()).expect("tolerant");
    let mut sorted = report.findings.clone();
    sorted.sort_by(|a, b| a.kind.cmp(&b.kind).then(a.ids.cmp(&b.ids)));
    assert_eq!(report.findings, sorted);
}

#[test]
fn test_strict_mode_stops_at_first_fatal() {
    let result = validate(&fixtures::cyclic(), &FatalPolicy::strict());
    match result {
        Err(SurveyDagError::StrictViolation(finding)) => {
            assert_eq!(finding.kind, FindingKind::CycleDetected);
        }
        Err(e) => panic!("Expected StrictViolation, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_strict_mode_tolerates_warnings_unless_listed() {
    let graph = SurveyBuilder::new()
        .question("Q1", &[1])
        .question("Q2", &[1])
        .terminal("END")
        .start("Q1")
        .always("E1", "Q1", "END")
        .always("E2", "END", "Q2")
        .build();

    assert!(validate(&graph, &FatalPolicy::strict()).is_ok());

    let policy = FatalPolicy::strict().with_fatal(FindingKind::DeadEndNode);
    assert!(matches!(
        validate(&graph, &policy),
        Err(SurveyDagError::StrictViolation(f)) if f.kind == FindingKind::DeadEndNode
    ));

    // Listing a kind has no effect in tolerant mode.
    let tolerant = FatalPolicy::tolerant().with_fatal(FindingKind::DeadEndNode);
    assert!(validate(&graph, &tolerant).is_ok());
}

#[test]
fn test_ill_typed_edge_does_not_orphan_its_target() {
    let graph = SurveyBuilder::new()
        .question("Q1", &[1, 2])
        .question("Q2", &[1])
        .terminal("END")
        .start("Q1")
        .when(
            "E1",
            "Q1",
            "Q2",
            "P_BAD",
            Predicate::compare(CmpOp::Gt, "Q1", "five"),
        )
        .fallthrough("E2", "Q1", "END")
        .always("E3", "Q2", "END")
        .build();

    let report = validate(&graph, &FatalPolicy::tolerant()).expect("tolerant");
    assert_eq!(kinds(&report.findings), vec![FindingKind::InvalidPredicate]);
    assert!(report.gates.all_reachable);
}
