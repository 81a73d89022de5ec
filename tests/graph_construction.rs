mod common;

use serde_json::json;
use surveydag::document::{build_graph, parse_document};
use surveydag::errors::SurveyDagError;
use surveydag::graph::{EdgeKind, EdgeSpec, NodeKind};
use surveydag::predicate::Predicate;
use surveydag_test_utils::builders::SurveyBuilder;
use surveydag_test_utils::fixtures::{self, BRANCHING_JSON};

fn expect_malformed(builder: SurveyBuilder, needle: &str) {
    match builder.try_build() {
        Err(SurveyDagError::MalformedGraph(msg)) => {
            assert!(msg.contains(needle), "message '{msg}' should mention '{needle}'");
        }
        Err(e) => panic!("Expected MalformedGraph, got: {e:?}"),
        Ok(_) => panic!("Expected MalformedGraph, got Ok"),
    }
}

fn minimal() -> SurveyBuilder {
    SurveyBuilder::new()
        .question("Q1", &[1, 2])
        .terminal("END")
        .start("Q1")
        .always("E1", "Q1", "END")
}

#[test]
fn test_branching_fixture_shape() {
    let graph = fixtures::branching();
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 4);
    assert_eq!(graph.node_id(graph.start()), "Q1");

    let end = graph.find_node("END").expect("END exists");
    assert!(graph.is_terminal(end));
    assert_eq!(graph.terminals(), &[end]);

    let q1 = graph.start();
    let out: Vec<&str> = graph.outgoing(q1).iter().map(|e| graph.edge_id(*e)).collect();
    assert_eq!(out, vec!["E1", "E2"]);
    let inc: Vec<&str> = graph.incoming(end).iter().map(|e| graph.edge_id(*e)).collect();
    assert_eq!(inc, vec!["E3", "E4"]);
}

#[test]
fn test_outgoing_priority_order() {
    // Conditional edges come before fallthrough, then lower priority value,
    // then document order.
    let graph = SurveyBuilder::new()
        .question("Q1", &[1, 2, 3])
        .terminal("END")
        .start("Q1")
        .predicate("P1", Predicate::eq("Q1", 1))
        .predicate("P2", Predicate::eq("Q1", 2))
        .fallthrough("F", "Q1", "END")
        .edge(EdgeSpec::new("B2", "Q1", "END").when("P2").priority(2))
        .edge(EdgeSpec::new("B1", "Q1", "END").when("P1").priority(1))
        .edge(EdgeSpec::new("B1b", "Q1", "END").when("P2").priority(1))
        .build();

    let out: Vec<&str> = graph
        .outgoing(graph.start())
        .iter()
        .map(|e| graph.edge_id(*e))
        .collect();
    assert_eq!(out, vec!["B1", "B1b", "B2", "F"]);
    let fallthrough = graph.find_edge("F").expect("F exists");
    assert_eq!(graph.edge(fallthrough).kind, EdgeKind::Fallthrough);
}

#[test]
fn test_terminal_kind_counts_as_terminal() {
    let graph = SurveyBuilder::new()
        .question("Q1", &[1])
        .node(surveydag::graph::Node::new("STOP", NodeKind::Terminal))
        .terminal("END")
        .start("Q1")
        .always("E1", "Q1", "STOP")
        .always("E2", "Q1", "END")
        .build();
    let stop = graph.find_node("STOP").expect("STOP exists");
    assert!(graph.is_terminal(stop));
}

#[test]
fn test_duplicate_ids_are_malformed() {
    expect_malformed(minimal().question("Q1", &[1]), "duplicate node id 'Q1'");
    expect_malformed(minimal().always("E1", "Q1", "END"), "duplicate edge id 'E1'");
    expect_malformed(
        minimal()
            .predicate("P", Predicate::eq("Q1", 1))
            .predicate("P", Predicate::eq("Q1", 2)),
        "duplicate predicate id 'P'",
    );
}

#[test]
fn test_unresolved_references_are_malformed() {
    expect_malformed(minimal().always("E2", "Q1", "NOWHERE"), "unknown target 'NOWHERE'");
    expect_malformed(minimal().always("E2", "GHOST", "END"), "unknown source 'GHOST'");
    expect_malformed(minimal().branch("E2", "Q1", "END", "P_MISSING"), "unknown predicate 'P_MISSING'");
    expect_malformed(
        minimal().predicate("P", Predicate::eq("Q42", 1)),
        "references unknown node 'Q42'",
    );
    expect_malformed(
        minimal().hidden_question("Q2", &[1], "P_NONE"),
        "unknown universe predicate 'P_NONE'",
    );
}

#[test]
fn test_start_and_terminals_must_resolve() {
    expect_malformed(
        SurveyBuilder::new()
            .question("Q1", &[1])
            .terminal("END")
            .always("E1", "Q1", "END"),
        "no start node",
    );
    expect_malformed(minimal().start("Q7"), "start node 'Q7' is not declared");

    let no_terminals = SurveyBuilder::new()
        .question("Q1", &[1])
        .question("Q2", &[1])
        .start("Q1")
        .always("E1", "Q1", "Q2");
    expect_malformed(no_terminals, "declares no terminals");
}

#[test]
fn test_document_builds_equivalent_graph() {
    let doc = parse_document(BRANCHING_JSON).expect("fixture parses");
    let graph = build_graph(&doc.survey_dag).expect("fixture builds");

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 4);
    let def = graph.predicate("P_Q1_IN_23").expect("predicate present");
    assert_eq!(def.text.as_deref(), Some("Q1 in {2, 3}"));
    assert_eq!(def.predicate, Predicate::member_of("Q1", [2, 3]));

    let e3 = graph.find_edge("E3").expect("E3 exists");
    assert_eq!(graph.edge(e3).kind, EdgeKind::Branch);
    assert!(graph.edge(e3).condition.predicate_id().is_none());
}

#[test]
fn test_fingerprint_is_stable_and_content_sensitive() {
    let doc = parse_document(BRANCHING_JSON).expect("fixture parses");
    let a = build_graph(&doc.survey_dag).expect("builds");
    let b = build_graph(&doc.survey_dag).expect("builds");
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.fingerprint().len(), 64);

    let mut changed = doc.clone();
    changed.survey_dag.graph.edges[0].priority = 7;
    let c = build_graph(&changed.survey_dag).expect("builds");
    assert_ne!(a.fingerprint(), c.fingerprint());
}

fn single_node_doc(node: serde_json::Value, predicates: serde_json::Value) -> String {
    json!({
        "survey_dag": {
            "graph": {
                "start": "Q1",
                "terminals": ["END"],
                "nodes": [node, { "id": "END", "type": "terminal" }],
                "edges": [{ "id": "E1", "source": "Q1", "target": "END" }]
            },
            "predicates": predicates
        }
    })
    .to_string()
}

#[test]
fn test_junction_alias_and_universe_forms() {
    let text = single_node_doc(
        json!({ "id": "Q1", "type": "junction", "universe": { "predicate": "P_ON", "text": "always" } }),
        json!({ "P_ON": { "ast": ["TRUE"] } }),
    );
    let doc = parse_document(&text).expect("parses");
    let graph = build_graph(&doc.survey_dag).expect("builds");
    let q1 = graph.node(graph.start());
    assert_eq!(q1.kind, NodeKind::Instruction);
    assert_eq!(q1.universe.predicate_id(), Some("P_ON"));

    let text = single_node_doc(
        json!({ "id": "Q1", "type": "question", "universe": "P_ON" }),
        json!({ "P_ON": { "ast": ["TRUE"] } }),
    );
    let doc = parse_document(&text).expect("parses");
    let graph = build_graph(&doc.survey_dag).expect("builds");
    assert_eq!(graph.node(graph.start()).universe.predicate_id(), Some("P_ON"));
}

#[test]
fn test_bad_ast_and_domain_are_malformed() {
    let text = single_node_doc(
        json!({ "id": "Q1", "type": "question" }),
        json!({ "P_BAD": { "ast": ["XOR", "Q1", 1] } }),
    );
    let doc = parse_document(&text).expect("parses");
    assert!(matches!(
        build_graph(&doc.survey_dag),
        Err(SurveyDagError::MalformedGraph(msg)) if msg.contains("P_BAD")
    ));

    let text = single_node_doc(
        json!({ "id": "Q1", "type": "question", "domain": { "kind": "numeric", "min": "low" } }),
        json!({}),
    );
    let doc = parse_document(&text).expect("parses");
    assert!(matches!(
        build_graph(&doc.survey_dag),
        Err(SurveyDagError::MalformedGraph(msg)) if msg.contains("invalid domain")
    ));
}
