mod common;

use common::strings;
use surveydag::coverage::{Element, solve};
use surveydag::graph::EdgeSpec;
use surveydag::paths::{EnumerationLimits, Path, PathEnumerator};
use surveydag::predicate::{Assignment, Predicate};
use surveydag_test_utils::builders::SurveyBuilder;
use surveydag_test_utils::fixtures;

#[test]
fn test_every_branch_needs_its_own_path() {
    let graph = fixtures::branching();
    let paths = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate().paths;
    let coverage = solve(&graph, &paths);

    assert_eq!(coverage.selected, vec![0, 1]);
    assert!(coverage.is_complete());
    assert_eq!(coverage.percentage(), 100.0);
    assert_eq!(coverage.total_elements, 8);

    let end = coverage.nodes.iter().find(|c| c.id == "END").expect("END listed");
    assert_eq!(end.paths, strings(&["path_001", "path_002"]));
    let e1 = coverage.edges.iter().find(|c| c.id == "E1").expect("E1 listed");
    assert_eq!(e1.paths, strings(&["path_001"]));

    let q2 = graph.find_node("Q2").expect("Q2 exists");
    assert!(coverage.is_covered(Element::Node(q2)));
}

#[test]
fn test_redundant_paths_are_skipped() {
    // Four paths, but two of them touch every node and edge.
    let graph = fixtures::diamonds(2);
    let paths = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate().paths;
    assert_eq!(paths.len(), 4);

    let coverage = solve(&graph, &paths);
    assert!(coverage.is_complete());
    assert_eq!(coverage.selected.len(), 2);
    // Equal gain and length: the smaller node-id sequence (through N0, N1)
    // wins, then the path covering the rest.
    assert_eq!(coverage.selected, vec![3, 0]);
}

#[test]
fn test_ties_break_on_node_ids_not_enumeration_order() {
    let graph = SurveyBuilder::new()
        .question("Q1", &[1, 2])
        .instruction("A")
        .instruction("B")
        .terminal("END")
        .start("Q1")
        .predicate("P_Q1_EQ_1", Predicate::eq("Q1", 1))
        .predicate("P_Q1_EQ_2", Predicate::eq("Q1", 2))
        .edge(EdgeSpec::new("E1", "Q1", "A").when("P_Q1_EQ_1").priority(2))
        .edge(EdgeSpec::new("E2", "Q1", "B").when("P_Q1_EQ_2").priority(1))
        .always("E3", "A", "END")
        .always("E4", "B", "END")
        .build();

    let paths = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate().paths;
    // Priority puts the route through B first.
    assert_eq!(paths[0].node_ids(&graph), vec!["Q1", "B", "END"]);

    let coverage = solve(&graph, &paths);
    assert_eq!(coverage.selected, vec![1, 0]);
}

#[test]
fn test_unreachable_elements_stay_uncovered() {
    let graph = fixtures::with_orphan();
    let paths = PathEnumerator::new(&graph, EnumerationLimits::default()).enumerate().paths;
    let coverage = solve(&graph, &paths);

    assert!(!coverage.is_complete());
    assert_eq!(coverage.uncovered, strings(&["Q9", "E9"]));
    assert_eq!(coverage.covered_elements, 8);
    assert_eq!(coverage.total_elements, 10);
    assert_eq!(coverage.percentage(), 80.0);
}

#[test]
fn test_no_paths_covers_nothing() {
    let graph = fixtures::linear();
    let coverage = solve(&graph, &[]);
    assert!(coverage.selected.is_empty());
    assert_eq!(coverage.covered_elements, 0);
    assert_eq!(
        coverage.uncovered,
        strings(&["END", "Q1", "Q2", "E1", "E2"])
    );
}

#[test]
fn test_equal_gain_prefers_fewer_edges() {
    let graph = SurveyBuilder::new()
        .question("S", &[1, 2, 3])
        .instruction("B")
        .instruction("C")
        .instruction("D")
        .instruction("Z")
        .terminal("END")
        .start("S")
        .always("E1", "S", "Z")
        .always("E2", "Z", "END")
        .always("E4", "B", "END")
        .always("E5", "S", "C")
        .always("E6", "C", "B")
        .always("E7", "S", "D")
        .always("E8", "D", "B")
        .build();

    let path = |nodes: &[&str], edges: &[&str]| Path {
        nodes: nodes.iter().filter_map(|id| graph.find_node(id)).collect(),
        edges: edges.iter().filter_map(|id| graph.find_edge(id)).collect(),
        assignment: Assignment::new(),
    };
    let paths = vec![
        path(&["S", "D", "B", "END"], &["E7", "E8", "E4"]),
        path(&["S", "Z", "END"], &["E1", "E2"]),
        path(&["S", "C", "B", "END"], &["E5", "E6", "E4"]),
    ];

    let coverage = solve(&graph, &paths);
    // After the route through C, both others add three elements. The
    // shorter one wins even though its node ids sort after the longer one's.
    assert_eq!(coverage.selected, vec![2, 1, 0]);
    assert!(coverage.is_complete());
}
