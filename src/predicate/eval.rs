// src/predicate/eval.rs

//! Evaluation of predicates against a partial assignment.
//!
//! Evaluation is pure and total: every outcome is either a boolean or an
//! [`EvalError`]. A reference to a node that has no recorded response is
//! [`EvalError::UnboundVariable`], never a silent `false`; deciding what an
//! unbound reference means is left to the caller.

use thiserror::Error;

use crate::predicate::ast::{Assignment, CmpOp, LogicalOp, Predicate, Value};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("unbound variable: no response recorded for '{0}'")]
    UnboundVariable(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),
}

/// Evaluate `predicate` under `assignment`.
///
/// `and` / `or` short-circuit left to right, so for `a and b` with `a` false
/// an unbound variable inside `b` is never reported.
pub fn evaluate(predicate: &Predicate, assignment: &Assignment) -> Result<bool, EvalError> {
    match predicate {
        Predicate::LiteralTrue => Ok(true),
        Predicate::VariableRef(_) | Predicate::Constant(_) => {
            match operand(predicate, assignment)? {
                Value::Bool(b) => Ok(b),
                other => Err(EvalError::TypeMismatch(format!(
                    "{other} used as a condition"
                ))),
            }
        }
        Predicate::Comparison { op, lhs, rhs } => {
            let lhs = operand(lhs, assignment)?;
            let rhs = operand(rhs, assignment)?;
            compare(*op, &lhs, &rhs)
        }
        Predicate::Logical { op, operands } => match op {
            LogicalOp::And => {
                for p in operands {
                    if !evaluate(p, assignment)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            LogicalOp::Or => {
                for p in operands {
                    if evaluate(p, assignment)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            LogicalOp::Not => match operands.as_slice() {
                [inner] => Ok(!evaluate(inner, assignment)?),
                _ => Err(EvalError::TypeMismatch(format!(
                    "not expects exactly one operand, got {}",
                    operands.len()
                ))),
            },
        },
        Predicate::Membership { needle, set } => {
            let value = operand(needle, assignment)?;
            Ok(set.iter().any(|member| value.loosely_equals(member)))
        }
    }
}

/// Resolve an operand to a value. Non-leaf operands contribute their
/// boolean result.
fn operand(expr: &Predicate, assignment: &Assignment) -> Result<Value, EvalError> {
    match expr {
        Predicate::VariableRef(id) => assignment
            .get(id)
            .cloned()
            .ok_or_else(|| EvalError::UnboundVariable(id.clone())),
        Predicate::Constant(value) => Ok(value.clone()),
        other => evaluate(other, assignment).map(Value::Bool),
    }
}

/// Type-aware comparison of two values.
///
/// - `==` / `!=` never fail: values of different types are simply unequal.
/// - ordered operators require two numbers.
pub fn compare(op: CmpOp, lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
    match op {
        CmpOp::Eq => Ok(lhs.loosely_equals(rhs)),
        CmpOp::Ne => Ok(!lhs.loosely_equals(rhs)),
        CmpOp::Lt | CmpOp::Le | CmpOp::Gt | CmpOp::Ge => {
            let ordering = match (lhs, rhs) {
                (Value::Int(a), Value::Int(b)) => a.cmp(b),
                _ => match (lhs.as_f64(), rhs.as_f64()) {
                    (Some(a), Some(b)) => a.partial_cmp(&b).ok_or_else(|| {
                        EvalError::TypeMismatch(format!("{lhs} {op} {rhs}: not comparable"))
                    })?,
                    _ => {
                        return Err(EvalError::TypeMismatch(format!(
                            "{lhs} {op} {rhs}: ordered comparison needs two numbers"
                        )));
                    }
                },
            };
            Ok(match op {
                CmpOp::Lt => ordering.is_lt(),
                CmpOp::Le => ordering.is_le(),
                CmpOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            })
        }
    }
}
