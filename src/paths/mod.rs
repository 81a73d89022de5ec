// src/paths/mod.rs

//! Path enumeration under predicate constraints.
//!
//! [`PathEnumerator`] yields every satisfiable route from `start` to a
//! terminal, with the responses that realise it, until the
//! [`EnumerationLimits`] run out. A cut-short enumeration always carries its
//! [`TruncationReason`]s.

pub mod budget;
pub mod candidates;
pub mod enumerator;
pub mod path;
pub mod replay;

pub use budget::{Budget, EnumerationLimits};
pub use enumerator::{PathEnumerator, Paths, Seed, Split, split_frontier};
pub use path::{
    DeadEnd, DeadEndReason, Enumeration, Path, PathRecord, RuntimeAmbiguity, TruncationReason,
    path_id,
};
pub use replay::{Replay, ReplayError, replay};
