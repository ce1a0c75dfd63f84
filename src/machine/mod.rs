//! The step-state machine.
//!
//! A [`TraceSnapshot`] is the complete observable state of one run. The
//! free functions here are pure: [`reset`] builds a fresh snapshot,
//! [`advance`] performs one micro-transition and [`apply`] folds an
//! [`Event`] into a snapshot. [`Stepper`] wraps them with a step counter
//! and transition history for callers that want to hold state.

mod stepper;

pub use stepper::{StepResult, Stepper};

use crate::algorithms::{Algorithm, BinarySearch, BubbleSort, LinearSearch, SelectionSort};
use crate::core::{
    AlgorithmKind, Cursor, HighlightSets, Phase, Range, SearchTarget, SearchTargets,
    WorkingSequence,
};
use crate::dataset;
use serde::{Deserialize, Serialize};

/// One algorithm's run, tagged by kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum AlgorithmRun {
    Bubble(BubbleSort),
    Selection(SelectionSort),
    LinearSearch(LinearSearch),
    BinarySearch(BinarySearch),
}

macro_rules! dispatch {
    ($run:expr, $alg:ident => $body:expr) => {
        match $run {
            AlgorithmRun::Bubble($alg) => $body,
            AlgorithmRun::Selection($alg) => $body,
            AlgorithmRun::LinearSearch($alg) => $body,
            AlgorithmRun::BinarySearch($alg) => $body,
        }
    };
}

impl AlgorithmRun {
    /// A fresh run over the fixed dataset for `kind`.
    pub fn fresh(kind: AlgorithmKind, targets: &SearchTargets) -> Self {
        match kind {
            AlgorithmKind::Bubble => Self::Bubble(BubbleSort::new(dataset::bubble_values())),
            AlgorithmKind::Selection => {
                Self::Selection(SelectionSort::new(dataset::selection_values()))
            }
            AlgorithmKind::LinearSearch => Self::LinearSearch(LinearSearch::new(
                dataset::customer_table(),
                targets.name.clone(),
            )),
            AlgorithmKind::BinarySearch => Self::BinarySearch(BinarySearch::new(
                dataset::binary_search_values(),
                targets.number,
            )),
        }
    }

    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Self::Bubble(_) => BubbleSort::KIND,
            Self::Selection(_) => SelectionSort::KIND,
            Self::LinearSearch(_) => LinearSearch::KIND,
            Self::BinarySearch(_) => BinarySearch::KIND,
        }
    }

    pub fn phase_name(&self) -> &'static str {
        dispatch!(self, alg => alg.phase().name())
    }

    pub fn is_at_start(&self) -> bool {
        dispatch!(self, alg => alg.phase().is_start())
    }

    pub fn is_terminal(&self) -> bool {
        dispatch!(self, alg => alg.phase().is_final())
    }

    pub fn cursor(&self) -> Cursor {
        dispatch!(self, alg => alg.cursor())
    }

    pub fn range(&self) -> Option<Range> {
        dispatch!(self, alg => alg.range())
    }

    pub fn sequence(&self) -> WorkingSequence {
        dispatch!(self, alg => alg.sequence())
    }

    pub fn ready_message(&self) -> String {
        dispatch!(self, alg => alg.ready_message())
    }

    fn step(&mut self, highlights: &mut HighlightSets) -> Option<String> {
        dispatch!(self, alg => alg.step(highlights))
    }

    /// Point a search at a new target. Returns `false` if the target does
    /// not fit this algorithm.
    fn retarget(&mut self, target: &SearchTarget) -> bool {
        match (self, target) {
            (Self::LinearSearch(search), SearchTarget::Name(name)) => {
                search.retarget(name.clone());
                true
            }
            (Self::BinarySearch(search), SearchTarget::Number(number)) => {
                search.retarget(*number);
                true
            }
            _ => false,
        }
    }
}

/// Everything the presentation layer and narration gateway may read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceSnapshot {
    pub run: AlgorithmRun,
    pub highlights: HighlightSets,
    pub message: String,
}

impl TraceSnapshot {
    /// The snapshot before any step: empty highlights and a ready message.
    pub fn initial(run: AlgorithmRun) -> Self {
        let message = run.ready_message();
        Self {
            run,
            highlights: HighlightSets::new(),
            message,
        }
    }

    pub fn kind(&self) -> AlgorithmKind {
        self.run.kind()
    }

    pub fn phase_name(&self) -> &'static str {
        self.run.phase_name()
    }

    pub fn is_at_start(&self) -> bool {
        self.run.is_at_start()
    }

    pub fn is_terminal(&self) -> bool {
        self.run.is_terminal()
    }

    pub fn cursor(&self) -> Cursor {
        self.run.cursor()
    }

    pub fn range(&self) -> Option<Range> {
        self.run.range()
    }

    pub fn sequence(&self) -> WorkingSequence {
        self.run.sequence()
    }

    /// Advance in place. Returns `false` when already terminal.
    pub fn step(&mut self) -> bool {
        match self.run.step(&mut self.highlights) {
            Some(message) => {
                self.message = message;
                true
            }
            None => false,
        }
    }
}

/// Inputs that move a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Advance,
    Reset {
        kind: AlgorithmKind,
        targets: SearchTargets,
    },
    EditTarget {
        target: SearchTarget,
    },
}

/// Discard everything and start `kind` over from its fixed dataset.
pub fn reset(kind: AlgorithmKind, targets: &SearchTargets) -> TraceSnapshot {
    TraceSnapshot::initial(AlgorithmRun::fresh(kind, targets))
}

/// Perform one micro-transition. A terminal snapshot comes back unchanged.
pub fn advance(snapshot: &TraceSnapshot) -> TraceSnapshot {
    let mut next = snapshot.clone();
    next.step();
    next
}

/// Fold one event into a snapshot.
///
/// `EditTarget` only takes effect in the start phase and only when the
/// target fits the running search; otherwise the snapshot is unchanged.
pub fn apply(snapshot: &TraceSnapshot, event: &Event) -> TraceSnapshot {
    match event {
        Event::Advance => advance(snapshot),
        Event::Reset { kind, targets } => reset(*kind, targets),
        Event::EditTarget { target } => {
            if !snapshot.is_at_start() {
                return snapshot.clone();
            }
            let mut run = snapshot.run.clone();
            if run.retarget(target) {
                TraceSnapshot::initial(run)
            } else {
                snapshot.clone()
            }
        }
    }
}

/// Run `kind` from reset to `done`, returning every snapshot on the way
/// (the initial one included).
pub fn trace(kind: AlgorithmKind, targets: &SearchTargets) -> Vec<TraceSnapshot> {
    let mut current = reset(kind, targets);
    let mut snapshots = vec![current.clone()];
    while current.step() {
        snapshots.push(current.clone());
    }
    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_gives_documented_initial_state() {
        let targets = SearchTargets::default();

        let bubble = reset(AlgorithmKind::Bubble, &targets);
        assert_eq!(bubble.cursor(), Cursor::new(0, 3));
        assert_eq!(bubble.phase_name(), "start");
        assert!(bubble.highlights.is_empty());

        let selection = reset(AlgorithmKind::Selection, &targets);
        assert_eq!(selection.cursor(), Cursor::new(0, 1));

        let linear = reset(AlgorithmKind::LinearSearch, &targets);
        assert_eq!(linear.cursor(), Cursor::new(0, 0));
        assert_eq!(linear.message, "Tìm kiếm tuần tự: Bắt đầu tìm \"Hoàng Mai\".");

        let binary = reset(AlgorithmKind::BinarySearch, &targets);
        assert_eq!(binary.range(), Some(Range { low: 0, high: 9, mid: 4 }));
        assert_eq!(binary.message, "Tìm kiếm nhị phân: Tìm số 32 trong dãy.");
    }

    #[test]
    fn advance_after_done_is_unchanged() {
        let targets = SearchTargets::default();
        for kind in AlgorithmKind::ALL {
            let last = trace(kind, &targets).pop().unwrap();
            assert!(last.is_terminal());
            assert_eq!(advance(&last), last);
        }
    }

    #[test]
    fn advance_does_not_touch_input_snapshot() {
        let start = reset(AlgorithmKind::Bubble, &SearchTargets::default());
        let copy = start.clone();
        let next = advance(&start);
        assert_eq!(start, copy);
        assert_ne!(next, start);
    }

    #[test]
    fn edit_target_applies_only_at_start() {
        let start = reset(AlgorithmKind::BinarySearch, &SearchTargets::default());
        let edit = Event::EditTarget {
            target: SearchTarget::Number(75),
        };

        let edited = apply(&start, &edit);
        assert_eq!(edited.message, "Tìm kiếm nhị phân: Tìm số 75 trong dãy.");

        let moved = advance(&edited);
        assert_eq!(apply(&moved, &edit), moved);
    }

    #[test]
    fn edit_target_ignores_mismatched_kind() {
        let start = reset(AlgorithmKind::LinearSearch, &SearchTargets::default());
        let edited = apply(
            &start,
            &Event::EditTarget {
                target: SearchTarget::Number(3),
            },
        );
        assert_eq!(edited, start);
    }

    #[test]
    fn reset_event_replaces_everything() {
        let targets = SearchTargets::default();
        let mut snapshot = reset(AlgorithmKind::Selection, &targets);
        for _ in 0..6 {
            snapshot = apply(&snapshot, &Event::Advance);
        }
        let fresh = apply(
            &snapshot,
            &Event::Reset {
                kind: AlgorithmKind::Selection,
                targets: targets.clone(),
            },
        );
        assert_eq!(fresh, reset(AlgorithmKind::Selection, &targets));
    }

    #[test]
    fn trace_starts_with_reset_and_ends_done() {
        let snapshots = trace(AlgorithmKind::BinarySearch, &SearchTargets::default());
        assert_eq!(snapshots.first().unwrap().phase_name(), "start");
        assert_eq!(snapshots.last().unwrap().phase_name(), "done");
    }

    #[test]
    fn snapshot_json_carries_algorithm_and_phase() {
        let snapshot = advance(&reset(AlgorithmKind::Bubble, &SearchTargets::default()));
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["run"]["algorithm"], "bubble");
        assert_eq!(json["run"]["phase"], "compare");

        let back: TraceSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
