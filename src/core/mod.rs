//! Core types for the step-state machine.
//!
//! This module contains the pure vocabulary shared by every algorithm:
//! - Phase tags via the `Phase` trait and the `phase_enum!` macro
//! - The data model (kinds, cursors, ranges, highlight sets, targets)
//! - Immutable transition history
//!
//! Nothing in here performs I/O or touches time beyond stamping history
//! entries.

mod history;
pub mod macros;
mod model;
mod phase;

pub use history::{TraceEntry, TraceHistory};
pub use model::{
    AlgorithmKind, Cursor, CustomerRecord, HighlightSets, Range, SearchTarget, SearchTargets,
    UnknownAlgorithm, WorkingSequence,
};
pub use phase::Phase;
