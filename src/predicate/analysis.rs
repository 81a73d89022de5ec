// src/predicate/analysis.rs

//! Static reasoning over predicates.
//!
//! Decisions that depend on responses are made by exhaustive evaluation over
//! finite (enumerated) domains, bounded by [`EXHAUSTIVE_LIMIT`]. Anything
//! beyond that bound, or touching a node without a finite domain, is left
//! undecided and deferred to path enumeration.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::predicate::ast::{Assignment, LogicalOp, Predicate, Value};
use crate::predicate::eval::{compare, evaluate};

/// Upper bound on the number of joint assignments tried by exhaustive checks.
pub const EXHAUSTIVE_LIMIT: usize = 4096;

/// Node ids referenced anywhere in the predicate.
pub fn free_variables(predicate: &Predicate) -> BTreeSet<String> {
    let mut vars = BTreeSet::new();
    predicate.visit(&mut |p| {
        if let Predicate::VariableRef(id) = p {
            vars.insert(id.clone());
        }
    });
    vars
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Trivial,
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    /// Weight used by the survey complexity score.
    pub fn weight(self) -> f64 {
        match self {
            Complexity::Trivial => 0.0,
            Complexity::Simple => 1.0,
            Complexity::Moderate => 2.0,
            Complexity::Complex => 3.0,
        }
    }
}

/// Classify by operator count: 0 trivial, 1 simple, 2-3 moderate, 4+ complex.
pub fn complexity(predicate: &Predicate) -> Complexity {
    let mut operators = 0usize;
    predicate.visit(&mut |p| {
        if matches!(
            p,
            Predicate::Comparison { .. } | Predicate::Logical { .. } | Predicate::Membership { .. }
        ) {
            operators += 1;
        }
    });
    match operators {
        0 => Complexity::Trivial,
        1 => Complexity::Simple,
        2..=3 => Complexity::Moderate,
        _ => Complexity::Complex,
    }
}

/// Static truth value of a predicate over every admissible assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    AlwaysTrue,
    AlwaysFalse,
    Contingent,
}

/// Decide whether `predicate` is constant.
///
/// A constant fold with unknown variables runs first (so `x == 1 and false`
/// is always false whatever `x` ranges over); remaining cases are decided
/// exhaustively when every free variable has a finite domain. A predicate
/// that fails to evaluate under some assignment is `Contingent`; its type
/// problems are reported separately.
pub fn static_truth<'d, F>(predicate: &Predicate, domains: F) -> Truth
where
    F: Fn(&str) -> Option<&'d [Value]>,
{
    match fold(predicate) {
        Some(true) => return Truth::AlwaysTrue,
        Some(false) => return Truth::AlwaysFalse,
        None => {}
    }

    let vars = free_variables(predicate);
    let Some(space) = AssignmentSpace::new(&vars, &domains) else {
        return Truth::Contingent;
    };

    let mut any_true = false;
    let mut any_other = false;
    for assignment in space {
        match evaluate(predicate, &assignment) {
            Ok(true) => any_true = true,
            Ok(false) => any_other = true,
            Err(_) => return Truth::Contingent,
        }
        if any_true && any_other {
            return Truth::Contingent;
        }
    }

    if any_true {
        Truth::AlwaysTrue
    } else {
        Truth::AlwaysFalse
    }
}

/// Three-valued fold treating every variable as unknown.
fn fold(predicate: &Predicate) -> Option<bool> {
    match predicate {
        Predicate::LiteralTrue => Some(true),
        Predicate::Constant(Value::Bool(b)) => Some(*b),
        Predicate::Constant(_) | Predicate::VariableRef(_) => None,
        Predicate::Comparison { op, lhs, rhs } => match (lhs.as_ref(), rhs.as_ref()) {
            (Predicate::Constant(a), Predicate::Constant(b)) => compare(*op, a, b).ok(),
            _ => None,
        },
        Predicate::Logical { op, operands } => match op {
            LogicalOp::And => {
                let folded: Vec<Option<bool>> = operands.iter().map(fold).collect();
                if folded.contains(&Some(false)) {
                    Some(false)
                } else if folded.iter().all(|v| *v == Some(true)) {
                    Some(true)
                } else {
                    None
                }
            }
            LogicalOp::Or => {
                let folded: Vec<Option<bool>> = operands.iter().map(fold).collect();
                if folded.contains(&Some(true)) {
                    Some(true)
                } else if folded.iter().all(|v| *v == Some(false)) {
                    Some(false)
                } else {
                    None
                }
            }
            LogicalOp::Not => match operands.as_slice() {
                [inner] => fold(inner).map(|b| !b),
                _ => None,
            },
        },
        Predicate::Membership { needle, set } => match needle.as_ref() {
            Predicate::Constant(value) => Some(set.iter().any(|m| value.loosely_equals(m))),
            _ => None,
        },
    }
}

/// Whether two predicates can be true at the same time.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlap {
    /// Both hold under the witnessing assignment.
    Overlapping(Assignment),
    /// Provably never both true.
    Exclusive,
    /// Could not be decided statically.
    Undecided,
}

pub fn overlap<'d, F>(a: &Predicate, b: &Predicate, domains: F) -> Overlap
where
    F: Fn(&str) -> Option<&'d [Value]>,
{
    if fold(a) == Some(false) || fold(b) == Some(false) {
        return Overlap::Exclusive;
    }

    let mut vars = free_variables(a);
    vars.extend(free_variables(b));
    let Some(space) = AssignmentSpace::new(&vars, &domains) else {
        return Overlap::Undecided;
    };

    for assignment in space {
        if evaluate(a, &assignment) == Ok(true) && evaluate(b, &assignment) == Ok(true) {
            return Overlap::Overlapping(assignment);
        }
    }
    Overlap::Exclusive
}

/// Static type problems: ordered comparisons against non-numeric constants,
/// non-boolean constants used as conditions, malformed `not`.
pub fn type_errors(predicate: &Predicate) -> Vec<String> {
    let mut errors = Vec::new();
    collect_type_errors(predicate, true, &mut errors);
    errors
}

fn collect_type_errors(predicate: &Predicate, condition: bool, errors: &mut Vec<String>) {
    match predicate {
        Predicate::LiteralTrue | Predicate::VariableRef(_) => {}
        Predicate::Constant(value) => {
            if condition && !matches!(value, Value::Bool(_)) {
                errors.push(format!("constant {value} used as a condition"));
            }
        }
        Predicate::Comparison { op, lhs, rhs } => {
            if op.is_ordered() {
                for side in [lhs.as_ref(), rhs.as_ref()] {
                    if let Predicate::Constant(value) = side {
                        if !value.is_numeric() {
                            errors.push(format!(
                                "'{predicate}': {op} needs a number, found {value}"
                            ));
                        }
                    }
                }
            }
            collect_type_errors(lhs, false, errors);
            collect_type_errors(rhs, false, errors);
        }
        Predicate::Logical { op, operands } => {
            if *op == LogicalOp::Not && operands.len() != 1 {
                errors.push(format!(
                    "not expects exactly one operand, got {}",
                    operands.len()
                ));
            }
            for operand in operands {
                collect_type_errors(operand, true, errors);
            }
        }
        Predicate::Membership { needle, .. } => collect_type_errors(needle, false, errors),
    }
}

/// Odometer over the cartesian product of finite domains.
struct AssignmentSpace<'d> {
    vars: Vec<(String, &'d [Value])>,
    cursor: Vec<usize>,
    exhausted: bool,
}

impl<'d> AssignmentSpace<'d> {
    /// `None` when some variable has no finite, non-empty domain or the
    /// product exceeds [`EXHAUSTIVE_LIMIT`].
    fn new<F>(vars: &BTreeSet<String>, domains: &F) -> Option<Self>
    where
        F: Fn(&str) -> Option<&'d [Value]>,
    {
        let mut resolved = Vec::with_capacity(vars.len());
        let mut size = 1usize;
        for var in vars {
            let values = domains(var).filter(|v| !v.is_empty())?;
            size = size.checked_mul(values.len())?;
            if size > EXHAUSTIVE_LIMIT {
                return None;
            }
            resolved.push((var.clone(), values));
        }
        let cursor = vec![0; resolved.len()];
        Some(Self {
            vars: resolved,
            cursor,
            exhausted: false,
        })
    }
}

impl Iterator for AssignmentSpace<'_> {
    type Item = Assignment;

    fn next(&mut self) -> Option<Assignment> {
        if self.exhausted {
            return None;
        }

        let assignment: Assignment = self
            .vars
            .iter()
            .zip(&self.cursor)
            .map(|((id, values), &i)| (id.clone(), values[i].clone()))
            .collect();

        // Advance the odometer; with zero variables there is exactly one
        // (empty) assignment.
        self.exhausted = true;
        for (slot, (_, values)) in self.cursor.iter_mut().zip(&self.vars).rev() {
            *slot += 1;
            if *slot < values.len() {
                self.exhausted = false;
                break;
            }
            *slot = 0;
        }

        Some(assignment)
    }
}
