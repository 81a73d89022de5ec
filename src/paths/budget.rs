// src/paths/budget.rs

//! Enumeration limits and the shared budget that enforces them.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::paths::path::TruncationReason;

/// Caller-supplied bounds on path enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerationLimits {
    pub max_paths: usize,
    /// Maximum number of edges in one path.
    pub max_depth: Option<usize>,
    pub time_budget: Option<Duration>,
}

impl EnumerationLimits {
    pub const DEFAULT_MAX_PATHS: usize = 10_000;

    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = max_paths;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}

impl Default for EnumerationLimits {
    fn default() -> Self {
        Self {
            max_paths: Self::DEFAULT_MAX_PATHS,
            max_depth: None,
            time_budget: None,
        }
    }
}

/// Budget shared by every worker of one enumeration.
///
/// The path counter is the only mutable state workers share. Limits are
/// checked at path boundaries and when a frame is entered, never in the
/// middle of predicate evaluation.
#[derive(Debug)]
pub struct Budget {
    limits: EnumerationLimits,
    deadline: Option<Instant>,
    produced: AtomicUsize,
    hit_max_paths: AtomicBool,
    hit_max_depth: AtomicBool,
    hit_time: AtomicBool,
}

impl Budget {
    pub fn new(limits: EnumerationLimits) -> Self {
        let deadline = limits
            .time_budget
            .and_then(|budget| Instant::now().checked_add(budget));
        Self {
            limits,
            deadline,
            produced: AtomicUsize::new(0),
            hit_max_paths: AtomicBool::new(false),
            hit_max_depth: AtomicBool::new(false),
            hit_time: AtomicBool::new(false),
        }
    }

    pub fn limits(&self) -> &EnumerationLimits {
        &self.limits
    }

    pub fn produced(&self) -> usize {
        self.produced.load(Ordering::SeqCst)
    }

    /// Reserve one slot for a completed path. `false` once `max_paths` paths
    /// have been handed out.
    pub fn claim_path(&self) -> bool {
        let max = self.limits.max_paths;
        let claimed = self
            .produced
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < max).then_some(n + 1)
            })
            .is_ok();
        if !claimed {
            self.hit_max_paths.store(true, Ordering::SeqCst);
        }
        claimed
    }

    /// Whether enumeration must stop now.
    ///
    /// The path limit only counts as hit once a path beyond it was actually
    /// found, so an enumeration with exactly `max_paths` paths is complete.
    pub fn should_stop(&self) -> bool {
        if self.hit_max_paths.load(Ordering::SeqCst) {
            return true;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.hit_time.store(true, Ordering::SeqCst);
                return true;
            }
        }
        false
    }

    /// Whether a path with `edges` edges would exceed `max_depth`; records
    /// the truncation when it would.
    pub fn exceeds_depth(&self, edges: usize) -> bool {
        match self.limits.max_depth {
            Some(max) if edges > max => {
                self.hit_max_depth.store(true, Ordering::SeqCst);
                true
            }
            _ => false,
        }
    }

    /// Reasons this budget cut the enumeration short, in a fixed order.
    pub fn truncation(&self) -> Vec<TruncationReason> {
        let mut reasons = Vec::new();
        if self.hit_max_paths.load(Ordering::SeqCst) {
            reasons.push(TruncationReason::MaxPaths);
        }
        if self.hit_max_depth.load(Ordering::SeqCst) {
            reasons.push(TruncationReason::MaxDepth);
        }
        if self.hit_time.load(Ordering::SeqCst) {
            reasons.push(TruncationReason::TimeBudget);
        }
        reasons
    }
}
