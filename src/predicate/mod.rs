// src/predicate/mod.rs

//! Routing predicates: the tree ([`ast`]), evaluation ([`eval`]), parsing
//! from the document format ([`parse`]) and static reasoning ([`analysis`]).

pub mod analysis;
pub mod ast;
pub mod eval;
pub mod parse;

pub use analysis::{Complexity, Overlap, Truth};
pub use ast::{Assignment, CmpOp, LogicalOp, Predicate, Value, render_assignment};
pub use eval::{EvalError, evaluate};
pub use parse::{AstError, parse_ast};
