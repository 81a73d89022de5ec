// src/predicate/parse.rs

//! Conversion from the nested-list document format into [`Predicate`].
//!
//! ```json
//! ["==", "Q1", 1]
//! ["AND", ["==", "Q1", 1], [">", "Q2", 5]]
//! ["IN", "Q3", [1, 2, 3]]
//! ["NOT", ["==", "Q4", 2]]
//! ["TRUE"]
//! ```
//!
//! In comparisons and `IN` the first operand string names a node; later
//! operand strings are text constants. `{"var": "Q1"}` references a node
//! explicitly in any position.

use serde_json::Value as Json;
use thiserror::Error;

use crate::predicate::ast::{CmpOp, LogicalOp, Predicate, Value};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AstError {
    #[error("empty expression")]
    Empty,

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("operator '{op}' expects {expected} operand(s), got {got}")]
    Arity {
        op: String,
        expected: &'static str,
        got: usize,
    },

    #[error("unsupported expression: {0}")]
    Unsupported(String),
}

/// Parse one predicate AST.
pub fn parse_ast(ast: &Json) -> Result<Predicate, AstError> {
    match ast {
        Json::Bool(true) => Ok(Predicate::LiteralTrue),
        Json::Bool(false) => Ok(Predicate::Constant(Value::Bool(false))),
        Json::String(s) if is_true_keyword(s) => Ok(Predicate::LiteralTrue),
        Json::String(s) if s.eq_ignore_ascii_case("false") => {
            Ok(Predicate::Constant(Value::Bool(false)))
        }
        Json::Array(items) => parse_list(items),
        Json::Object(_) => operand(ast, true),
        other => Err(AstError::Unsupported(other.to_string())),
    }
}

fn is_true_keyword(s: &str) -> bool {
    s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("always")
}

fn parse_list(items: &[Json]) -> Result<Predicate, AstError> {
    let (head, rest) = items.split_first().ok_or(AstError::Empty)?;
    let op = head
        .as_str()
        .ok_or_else(|| AstError::Unsupported(head.to_string()))?;
    let upper = op.trim().to_ascii_uppercase();

    match upper.as_str() {
        "TRUE" | "ALWAYS" => {
            expect_arity(op, rest, 0, "0")?;
            Ok(Predicate::LiteralTrue)
        }
        "FALSE" => {
            expect_arity(op, rest, 0, "0")?;
            Ok(Predicate::Constant(Value::Bool(false)))
        }
        "AND" | "OR" => {
            if rest.is_empty() {
                return Err(AstError::Arity {
                    op: op.to_string(),
                    expected: "at least 1",
                    got: 0,
                });
            }
            let operands = rest.iter().map(parse_ast).collect::<Result<Vec<_>, _>>()?;
            let op = if upper == "AND" {
                LogicalOp::And
            } else {
                LogicalOp::Or
            };
            Ok(Predicate::Logical { op, operands })
        }
        "NOT" => {
            expect_arity(op, rest, 1, "1")?;
            Ok(Predicate::not(parse_ast(&rest[0])?))
        }
        "IN" => {
            expect_arity(op, rest, 2, "2")?;
            let needle = operand(&rest[0], true)?;
            let set = match &rest[1] {
                Json::Array(values) => values.iter().map(literal).collect::<Result<Vec<_>, _>>()?,
                other => return Err(AstError::Unsupported(other.to_string())),
            };
            Ok(Predicate::Membership {
                needle: Box::new(needle),
                set,
            })
        }
        symbol => {
            let cmp = CmpOp::from_symbol(symbol)
                .ok_or_else(|| AstError::UnknownOperator(op.to_string()))?;
            expect_arity(op, rest, 2, "2")?;
            Ok(Predicate::Comparison {
                op: cmp,
                lhs: Box::new(operand(&rest[0], true)?),
                rhs: Box::new(operand(&rest[1], false)?),
            })
        }
    }
}

fn expect_arity(
    op: &str,
    rest: &[Json],
    expected: usize,
    label: &'static str,
) -> Result<(), AstError> {
    if rest.len() != expected {
        return Err(AstError::Arity {
            op: op.to_string(),
            expected: label,
            got: rest.len(),
        });
    }
    Ok(())
}

fn operand(json: &Json, leading: bool) -> Result<Predicate, AstError> {
    match json {
        Json::String(s) if leading => Ok(Predicate::VariableRef(s.clone())),
        Json::Object(map) => match map.get("var") {
            Some(Json::String(id)) => Ok(Predicate::VariableRef(id.clone())),
            _ => Err(AstError::Unsupported(json.to_string())),
        },
        Json::Array(_) => parse_ast(json),
        other => literal(other).map(Predicate::Constant),
    }
}

fn literal(json: &Json) -> Result<Value, AstError> {
    serde_json::from_value::<Value>(json.clone())
        .map_err(|_| AstError::Unsupported(json.to_string()))
}
