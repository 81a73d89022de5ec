// src/validate/findings.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every kind of finding the pipeline can report.
///
/// Declaration order is the primary sort key of findings in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    CycleDetected,
    OrphanNode,
    UnreachableTerminal,
    AmbiguousBranch,
    InvalidPredicate,
    DeadEndNode,
    StartIsTerminal,
    StartHasIncoming,
    TerminalHasOutgoing,
    UnusedPredicate,
    DeadEnd,
    Truncated,
    IncompleteCoverage,
}

impl FindingKind {
    pub const ALL: [FindingKind; 13] = [
        FindingKind::CycleDetected,
        FindingKind::OrphanNode,
        FindingKind::UnreachableTerminal,
        FindingKind::AmbiguousBranch,
        FindingKind::InvalidPredicate,
        FindingKind::DeadEndNode,
        FindingKind::StartIsTerminal,
        FindingKind::StartHasIncoming,
        FindingKind::TerminalHasOutgoing,
        FindingKind::UnusedPredicate,
        FindingKind::DeadEnd,
        FindingKind::Truncated,
        FindingKind::IncompleteCoverage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FindingKind::CycleDetected => "cycle_detected",
            FindingKind::OrphanNode => "orphan_node",
            FindingKind::UnreachableTerminal => "unreachable_terminal",
            FindingKind::AmbiguousBranch => "ambiguous_branch",
            FindingKind::InvalidPredicate => "invalid_predicate",
            FindingKind::DeadEndNode => "dead_end_node",
            FindingKind::StartIsTerminal => "start_is_terminal",
            FindingKind::StartHasIncoming => "start_has_incoming",
            FindingKind::TerminalHasOutgoing => "terminal_has_outgoing",
            FindingKind::UnusedPredicate => "unused_predicate",
            FindingKind::DeadEnd => "dead_end",
            FindingKind::Truncated => "truncated",
            FindingKind::IncompleteCoverage => "incomplete_coverage",
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            FindingKind::CycleDetected
            | FindingKind::OrphanNode
            | FindingKind::UnreachableTerminal
            | FindingKind::AmbiguousBranch
            | FindingKind::InvalidPredicate
            | FindingKind::StartIsTerminal => Severity::Error,
            FindingKind::UnusedPredicate => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FindingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        FindingKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| format!("unknown finding kind: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One reported problem: what, how bad, which ids, and a readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub ids: Vec<String>,
    pub message: String,
}

impl Finding {
    pub fn new(kind: FindingKind, ids: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            ids,
            message: message.into(),
        }
    }

    pub fn involves(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Canonical report order: kind, then involved ids, then message.
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        a.kind
            .cmp(&b.kind)
            .then_with(|| a.ids.cmp(&b.ids))
            .then_with(|| a.message.cmp(&b.message))
    });
}
