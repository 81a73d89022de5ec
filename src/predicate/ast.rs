// src/predicate/ast.rs

//! Predicate tree and response values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A concrete response recorded for a node.
///
/// JSON numbers without a fractional part deserialize as [`Value::Int`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }

    /// Equality as used by `==`, `!=` and `in`.
    ///
    /// Numbers compare numerically (`1 == 1.0`), text and booleans exactly.
    /// Values of different types are never equal.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Partial mapping from node id to the response recorded for that node.
pub type Assignment = BTreeMap<String, Value>;

/// Human-readable rendering of an assignment, e.g. `{Q1=1, Q2="yes"}`.
pub fn render_assignment(assignment: &Assignment) -> String {
    let parts: Vec<String> = assignment
        .iter()
        .map(|(id, value)| format!("{id}={value}"))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" | "=" => Some(CmpOp::Eq),
            "!=" | "<>" => Some(CmpOp::Ne),
            "<" => Some(CmpOp::Lt),
            "<=" => Some(CmpOp::Le),
            ">" => Some(CmpOp::Gt),
            ">=" => Some(CmpOp::Ge),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    /// `<`, `<=`, `>`, `>=` only make sense between numbers.
    pub fn is_ordered(self) -> bool {
        !matches!(self, CmpOp::Eq | CmpOp::Ne)
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

/// Boolean expression over node responses.
///
/// Leaves are either a [`Predicate::VariableRef`] (the response recorded for
/// a node) or a [`Predicate::Constant`]. Any non-leaf used as an operand of a
/// comparison contributes its boolean result.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    LiteralTrue,
    VariableRef(String),
    Constant(Value),
    Comparison {
        op: CmpOp,
        lhs: Box<Predicate>,
        rhs: Box<Predicate>,
    },
    Logical {
        op: LogicalOp,
        operands: Vec<Predicate>,
    },
    Membership {
        needle: Box<Predicate>,
        set: Vec<Value>,
    },
}

impl Predicate {
    pub fn var(id: impl Into<String>) -> Self {
        Predicate::VariableRef(id.into())
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Predicate::Constant(value.into())
    }

    /// `<node> <op> <constant>`, the shape nearly every routing rule takes.
    pub fn compare(op: CmpOp, node: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Comparison {
            op,
            lhs: Box::new(Predicate::var(node)),
            rhs: Box::new(Predicate::constant(value)),
        }
    }

    pub fn eq(node: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(CmpOp::Eq, node, value)
    }

    pub fn member_of<V: Into<Value>>(node: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Predicate::Membership {
            needle: Box::new(Predicate::var(node)),
            set: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn and(operands: Vec<Predicate>) -> Self {
        Predicate::Logical {
            op: LogicalOp::And,
            operands,
        }
    }

    pub fn or(operands: Vec<Predicate>) -> Self {
        Predicate::Logical {
            op: LogicalOp::Or,
            operands,
        }
    }

    pub fn not(inner: Predicate) -> Self {
        Predicate::Logical {
            op: LogicalOp::Not,
            operands: vec![inner],
        }
    }

    /// Pre-order walk over the tree.
    pub fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Predicate)) {
        f(self);
        match self {
            Predicate::Comparison { lhs, rhs, .. } => {
                lhs.visit(f);
                rhs.visit(f);
            }
            Predicate::Logical { operands, .. } => {
                for operand in operands {
                    operand.visit(f);
                }
            }
            Predicate::Membership { needle, .. } => needle.visit(f),
            Predicate::LiteralTrue | Predicate::VariableRef(_) | Predicate::Constant(_) => {}
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::LiteralTrue => f.write_str("true"),
            Predicate::VariableRef(id) => f.write_str(id),
            Predicate::Constant(value) => write!(f, "{value}"),
            Predicate::Comparison { op, lhs, rhs } => write!(f, "{lhs} {op} {rhs}"),
            Predicate::Logical {
                op: LogicalOp::Not,
                operands,
            } => {
                let inner: Vec<String> = operands.iter().map(|p| p.to_string()).collect();
                write!(f, "not ({})", inner.join(", "))
            }
            Predicate::Logical { op, operands } => {
                let joiner = if *op == LogicalOp::And { " and " } else { " or " };
                let parts: Vec<String> = operands.iter().map(|p| p.to_string()).collect();
                write!(f, "({})", parts.join(joiner))
            }
            Predicate::Membership { needle, set } => {
                let members: Vec<String> = set.iter().map(|v| v.to_string()).collect();
                write!(f, "{needle} in [{}]", members.join(", "))
            }
        }
    }
}
