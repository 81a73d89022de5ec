// src/document/convert.rs

use serde_json::Value as Json;

use crate::document::model::{NodeEntry, SurveyDag};
use crate::errors::{Result, SurveyDagError};
use crate::graph::{Condition, Domain, EdgeSpec, GraphBuilder, Node, PredicateDef, SurveyGraph};
use crate::predicate::parse_ast;

/// Build the immutable graph from a parsed document.
///
/// Fails with [`SurveyDagError::MalformedGraph`] on unparseable predicates,
/// unreadable domains and every unresolved id reference.
pub fn build_graph(dag: &SurveyDag) -> Result<SurveyGraph> {
    let mut builder = GraphBuilder::new();

    for (id, entry) in &dag.predicates {
        let predicate = parse_ast(&entry.ast).map_err(|e| {
            SurveyDagError::MalformedGraph(format!("predicate '{id}' cannot be parsed: {e}"))
        })?;
        builder = builder.predicate_def(PredicateDef {
            id: id.clone(),
            predicate,
            text: entry.text.clone(),
        });
    }

    for entry in &dag.graph.nodes {
        builder = builder.node(convert_node(entry)?);
    }

    for entry in &dag.graph.edges {
        let mut spec = EdgeSpec::new(&entry.id, &entry.source, &entry.target)
            .kind(entry.kind)
            .priority(entry.priority);
        if let Some(predicate) = &entry.predicate {
            spec = spec.when(predicate);
        }
        builder = builder.edge(spec);
    }

    if let Some(start) = &dag.graph.start {
        builder = builder.start(start);
    }
    for terminal in &dag.graph.terminals {
        builder = builder.terminal(terminal);
    }

    builder.build()
}

fn convert_node(entry: &NodeEntry) -> Result<Node> {
    let domain = match &entry.domain {
        None | Some(Json::Null) => None,
        Some(raw) => Some(serde_json::from_value::<Domain>(raw.clone()).map_err(|e| {
            SurveyDagError::MalformedGraph(format!("node '{}' has an invalid domain: {e}", entry.id))
        })?),
    };

    Ok(Node {
        id: entry.id.clone(),
        kind: entry.kind,
        domain,
        universe: universe_condition(entry.universe.as_ref()),
        metadata: entry.metadata.clone(),
    })
}

/// A universe without a resolved predicate id is always shown.
fn universe_condition(raw: Option<&Json>) -> Condition {
    match raw {
        Some(Json::String(id)) => Condition::Predicate(id.clone()),
        Some(Json::Object(map)) => match map.get("predicate") {
            Some(Json::String(id)) => Condition::Predicate(id.clone()),
            _ => Condition::Always,
        },
        _ => Condition::Always,
    }
}
