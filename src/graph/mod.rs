// src/graph/mod.rs

//! Survey graph model.
//!
//! - [`model`]: node / edge / domain types as they appear in a survey.
//! - [`builder`]: resolves id references and freezes the graph.
//! - [`survey_graph`]: the immutable, petgraph-backed graph with lookup
//!   indexes used by validation and enumeration.

pub mod builder;
pub mod model;
pub mod survey_graph;

pub use builder::GraphBuilder;
pub use model::{Condition, Domain, Edge, EdgeKind, EdgeSpec, Node, NodeKind, PredicateDef};
pub use survey_graph::SurveyGraph;
