#![allow(dead_code)]

//! Small surveys shared by the integration tests.

use surveydag::document::{SurveyDocument, parse_document};
use surveydag::graph::SurveyGraph;
use surveydag::predicate::{CmpOp, Predicate};

use crate::builders::SurveyBuilder;

/// `Q1 -> Q2 -> END`, unconditional edges.
pub fn linear() -> SurveyGraph {
    SurveyBuilder::new()
        .question("Q1", &[1, 2])
        .question("Q2", &[1, 2])
        .terminal("END")
        .start("Q1")
        .always("E1", "Q1", "Q2")
        .always("E2", "Q2", "END")
        .build()
}

/// `Q1 == 1` goes to Q2, `Q1 in {2, 3}` goes to Q3; both continue to END.
pub fn branching_builder() -> SurveyBuilder {
    SurveyBuilder::new()
        .question("Q1", &[1, 2, 3])
        .question("Q2", &[1, 2])
        .question("Q3", &[1, 2])
        .terminal("END")
        .start("Q1")
        .when("E1", "Q1", "Q2", "P_Q1_EQ_1", Predicate::eq("Q1", 1))
        .when(
            "E2",
            "Q1",
            "Q3",
            "P_Q1_IN_23",
            Predicate::member_of("Q1", [2, 3]),
        )
        .always("E3", "Q2", "END")
        .always("E4", "Q3", "END")
}

pub fn branching() -> SurveyGraph {
    branching_builder().build()
}

/// [`branching`] plus `Q9 -> END`, where nothing leads to Q9.
pub fn with_orphan() -> SurveyGraph {
    branching_builder()
        .question("Q9", &[1])
        .always("E9", "Q9", "END")
        .build()
}

/// `Q1 -> R1`, with a second declared terminal `R2a` that nothing reaches.
pub fn unreachable_terminal() -> SurveyGraph {
    SurveyBuilder::new()
        .question("Q1", &[1, 2])
        .terminal("R1")
        .terminal("R2a")
        .start("Q1")
        .always("E1", "Q1", "R1")
        .build()
}

/// `A -> B -> C -> A` when `C == 1`, otherwise `C -> END`.
pub fn cyclic() -> SurveyGraph {
    SurveyBuilder::new()
        .question("A", &[1])
        .question("B", &[1])
        .question("C", &[1, 2])
        .terminal("END")
        .start("A")
        .always("E1", "A", "B")
        .always("E2", "B", "C")
        .when("E3", "C", "A", "P_C_EQ_1", Predicate::eq("C", 1))
        .fallthrough("E4", "C", "END")
        .build()
}

/// `Q1 > 2` and `Q1 < 4` overlap at `Q1 == 3`.
pub fn ambiguous() -> SurveyGraph {
    SurveyBuilder::new()
        .question("Q1", &[1, 2, 3, 4, 5])
        .question("Q2", &[1])
        .question("Q3", &[1])
        .terminal("END")
        .start("Q1")
        .when("E1", "Q1", "Q2", "P_Q1_GT_2", Predicate::compare(CmpOp::Gt, "Q1", 2))
        .when("E2", "Q1", "Q3", "P_Q1_LT_4", Predicate::compare(CmpOp::Lt, "Q1", 4))
        .always("E3", "Q2", "END")
        .always("E4", "Q3", "END")
        .build()
}

/// Q2 is shown only when `Q1 == 1`; otherwise it is skipped silently and its
/// fallthrough edge is taken.
pub fn hidden_question() -> SurveyGraph {
    SurveyBuilder::new()
        .question("Q1", &[1, 2])
        .predicate("P_Q1_EQ_1", Predicate::eq("Q1", 1))
        .hidden_question("Q2", &[1, 2], "P_Q1_EQ_1")
        .terminal("END")
        .terminal("ALT")
        .start("Q1")
        .branch("E1", "Q1", "Q2", "P_Q1_EQ_1")
        .fallthrough("E1b", "Q1", "Q2")
        .when("E2", "Q2", "ALT", "P_Q2_EQ_2", Predicate::eq("Q2", 2))
        .fallthrough("E3", "Q2", "END")
        .build()
}

/// A wide survey: `width` independent yes/no questions in a row, each with
/// two routes to the next one.
pub fn diamonds(width: usize) -> SurveyGraph {
    let mut builder = SurveyBuilder::new().start("Q0").terminal("END");
    for i in 0..width {
        let q = format!("Q{i}");
        let yes = format!("Y{i}");
        let no = format!("N{i}");
        let next = if i + 1 == width {
            "END".to_string()
        } else {
            format!("Q{}", i + 1)
        };
        let pred = format!("P_{q}_EQ_1");
        builder = builder
            .question(&q, &[1, 2])
            .instruction(&yes)
            .instruction(&no)
            .when(&format!("E{i}a"), &q, &yes, &pred, Predicate::eq(q.as_str(), 1))
            .fallthrough(&format!("E{i}b"), &q, &no)
            .always(&format!("E{i}c"), &yes, &next)
            .always(&format!("E{i}d"), &no, &next);
    }
    builder.build()
}

/// JSON survey document equivalent to [`branching`].
pub const BRANCHING_JSON: &str = r#"{
  "survey_dag": {
    "metadata": { "title": "Branching fixture", "version": 3 },
    "graph": {
      "start": "Q1",
      "terminals": ["END"],
      "nodes": [
        { "id": "Q1", "type": "question", "domain": { "kind": "enum", "values": [1, 2, 3] } },
        { "id": "Q2", "type": "question", "domain": { "kind": "enum", "values": [1, 2] } },
        { "id": "Q3", "type": "question", "domain": { "kind": "enum", "values": [1, 2] } },
        { "id": "END", "type": "terminal" }
      ],
      "edges": [
        { "id": "E1", "source": "Q1", "target": "Q2", "predicate": "P_Q1_EQ_1", "kind": "branch", "priority": 1 },
        { "id": "E2", "source": "Q1", "target": "Q3", "predicate": "P_Q1_IN_23", "kind": "branch", "priority": 2 },
        { "id": "E3", "source": "Q2", "target": "END" },
        { "id": "E4", "source": "Q3", "target": "END" }
      ]
    },
    "predicates": {
      "P_Q1_EQ_1": { "ast": ["==", "Q1", 1], "text": "Q1 == 1" },
      "P_Q1_IN_23": { "ast": ["IN", "Q1", [2, 3]], "text": "Q1 in {2, 3}" }
    },
    "validation": null,
    "analysis": null
  }
}"#;

pub fn branching_document() -> SurveyDocument {
    parse_document(BRANCHING_JSON).expect("fixture document parses")
}
