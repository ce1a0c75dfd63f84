//! Per-algorithm transition tables.
//!
//! Each algorithm owns its working data, its cursor payload and a
//! strongly-typed phase enum. A phase from one algorithm can never be
//! paired with another algorithm's data because the two only exist
//! together inside the same struct.
//!
//! Comparisons that decide a swap or a direction use strict `<`; equal
//! elements never move.

mod binary;
mod bubble;
mod linear;
mod selection;

pub use binary::{BinarySearch, BinarySearchPhase};
pub use bubble::{BubblePhase, BubbleSort};
pub use linear::{LinearSearch, LinearSearchPhase};
pub use selection::{SelectionPhase, SelectionSort};

use crate::core::{AlgorithmKind, Cursor, HighlightSets, Phase, Range, WorkingSequence};

/// One algorithm's step-by-step interpreter.
pub trait Algorithm: Clone {
    type Phase: Phase;

    const KIND: AlgorithmKind;

    fn phase(&self) -> Self::Phase;

    fn cursor(&self) -> Cursor;

    /// The binary-search window, `None` for every other algorithm.
    fn range(&self) -> Option<Range> {
        None
    }

    /// A copy of the working data as it stands now.
    fn sequence(&self) -> WorkingSequence;

    /// Message shown before the first step.
    fn ready_message(&self) -> String;

    /// Perform exactly one micro-transition.
    ///
    /// Returns the message describing it, or `None` when the algorithm is
    /// already in its terminal phase (nothing changes in that case).
    fn step(&mut self, highlights: &mut HighlightSets) -> Option<String>;
}
