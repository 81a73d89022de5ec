// src/validate/mod.rs

//! Structural validation of a [`SurveyGraph`].
//!
//! Each check returns all of its findings instead of stopping at the first.
//! Whether a finding stops the pipeline is decided by a [`FatalPolicy`]:
//! in tolerant mode nothing does, in strict mode the validator stops after
//! the first check that produced a fatal finding.

pub mod acyclicity;
pub mod ambiguity;
pub mod findings;
pub mod flow;
pub mod reachability;

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::{Result, SurveyDagError};
use crate::graph::SurveyGraph;
use crate::types::ValidationMode;

pub use findings::{Finding, FindingKind, Severity, sort_findings};

/// Which findings are fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FatalPolicy {
    pub mode: ValidationMode,
    /// Kinds fatal in strict mode in addition to error-severity findings.
    pub extra_fatal: BTreeSet<FindingKind>,
}

impl FatalPolicy {
    pub fn tolerant() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            mode: ValidationMode::Strict,
            extra_fatal: BTreeSet::new(),
        }
    }

    pub fn with_fatal(mut self, kind: FindingKind) -> Self {
        self.extra_fatal.insert(kind);
        self
    }

    pub fn is_fatal(&self, finding: &Finding) -> bool {
        self.mode == ValidationMode::Strict
            && (finding.severity == Severity::Error || self.extra_fatal.contains(&finding.kind))
    }

    pub fn first_fatal<'a>(&self, findings: &'a [Finding]) -> Option<&'a Finding> {
        findings.iter().find(|f| self.is_fatal(f))
    }
}

/// Pass/fail summary of the structural invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gates {
    pub acyclic: bool,
    pub single_start: bool,
    pub all_reachable: bool,
    pub terminals_reachable: bool,
    pub predicates_valid: bool,
}

impl Gates {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let none_of = |kind: FindingKind| !findings.iter().any(|f| f.kind == kind);
        Self {
            acyclic: none_of(FindingKind::CycleDetected),
            single_start: none_of(FindingKind::StartHasIncoming),
            all_reachable: none_of(FindingKind::OrphanNode),
            terminals_reachable: none_of(FindingKind::UnreachableTerminal),
            predicates_valid: none_of(FindingKind::InvalidPredicate),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.acyclic
            && self.single_start
            && self.all_reachable
            && self.terminals_reachable
            && self.predicates_valid
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    pub gates: Gates,
}

impl ValidationReport {
    pub fn has(&self, kind: FindingKind) -> bool {
        self.findings.iter().any(|f| f.kind == kind)
    }

    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}

type Check = fn(&SurveyGraph) -> Vec<Finding>;

const CHECKS: [(&str, Check); 5] = [
    ("acyclicity", acyclicity::check),
    ("reachability", reachability::check),
    ("ambiguity", ambiguity::check),
    ("flow", flow::check),
    ("predicates", flow::check_predicates),
];

#[derive(Debug)]
pub struct Validator<'a> {
    graph: &'a SurveyGraph,
    policy: &'a FatalPolicy,
}

impl<'a> Validator<'a> {
    pub fn new(graph: &'a SurveyGraph, policy: &'a FatalPolicy) -> Self {
        Self { graph, policy }
    }

    /// Run every check in order.
    ///
    /// Returns [`SurveyDagError::StrictViolation`] with the first fatal
    /// finding when the policy is strict.
    pub fn run(&self) -> Result<ValidationReport> {
        let mut all = Vec::new();

        for (name, check) in CHECKS {
            let findings = check(self.graph);
            debug!(check = name, count = findings.len(), "validation check finished");

            if let Some(fatal) = self.policy.first_fatal(&findings) {
                warn!(check = name, finding = %fatal, "strict validation stopped");
                return Err(SurveyDagError::StrictViolation(fatal.clone()));
            }
            all.extend(findings);
        }

        sort_findings(&mut all);
        let gates = Gates::from_findings(&all);
        info!(
            findings = all.len(),
            passed = gates.all_passed(),
            "validation complete"
        );

        Ok(ValidationReport {
            findings: all,
            gates,
        })
    }
}

/// Convenience wrapper around [`Validator::run`].
pub fn validate(graph: &SurveyGraph, policy: &FatalPolicy) -> Result<ValidationReport> {
    Validator::new(graph, policy).run()
}
