// src/paths/candidates.rs

//! Representative responses tried at a shown question.
//!
//! Only values that can change routing matter: for finite domains every
//! value, otherwise the constants the predicate table compares the node
//! against, their neighbours, and a sentinel standing for "anything else".

use petgraph::graph::NodeIndex;

use crate::graph::{Domain, SurveyGraph};
use crate::predicate::Value;

/// Free-text response matching none of the constants in the predicate table.
pub const OTHER_RESPONSE: &str = "__other__";

pub fn candidates(graph: &SurveyGraph, node: NodeIndex) -> Vec<Value> {
    let hints = graph.response_hints(node);
    match &graph.node(node).domain {
        Some(Domain::Enum { values }) | Some(Domain::Set { values }) => values.clone(),
        Some(Domain::Numeric { min, max }) => numeric_candidates(*min, *max, hints),
        _ => text_candidates(hints),
    }
}

fn numeric_candidates(min: Option<f64>, max: Option<f64>, hints: &[Value]) -> Vec<Value> {
    let mut points: Vec<f64> = Vec::new();
    points.extend(min);
    points.extend(max);
    for hint in hints {
        if let Some(c) = hint.as_f64() {
            points.extend([c - 1.0, c, c + 1.0]);
        }
    }

    let in_bounds = |x: &f64| min.map_or(true, |lo| *x >= lo) && max.map_or(true, |hi| *x <= hi);
    let mut points: Vec<f64> = points.into_iter().filter(|x| x.is_finite() && in_bounds(x)).collect();
    points.sort_by(f64::total_cmp);
    points.dedup();

    if points.is_empty() {
        return vec![Value::Int(0)];
    }
    points.into_iter().map(number).collect()
}

fn number(x: f64) -> Value {
    if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
        Value::Int(x as i64)
    } else {
        Value::Float(x)
    }
}

fn text_candidates(hints: &[Value]) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::new();
    let mut push = |v: Value| {
        if !out.contains(&v) {
            out.push(v);
        }
    };
    for hint in hints {
        match hint {
            Value::Int(i) => {
                push(Value::Int(i.saturating_sub(1)));
                push(Value::Int(*i));
                push(Value::Int(i.saturating_add(1)));
            }
            Value::Float(x) => {
                push(number(x - 1.0));
                push(number(*x));
                push(number(x + 1.0));
            }
            other => push(other.clone()),
        }
    }
    push(Value::Text(OTHER_RESPONSE.to_string()));
    out
}
