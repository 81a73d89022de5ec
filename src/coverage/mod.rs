// src/coverage/mod.rs

pub mod solver;

pub use solver::{Coverage, Element, ElementCover, solve};
