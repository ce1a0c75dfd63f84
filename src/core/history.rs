//! Transition history tracking.
//!
//! Keeps an immutable log of every micro-transition a stepper performed,
//! so a session can be replayed or dumped after the fact.

use super::model::AlgorithmKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single micro-transition.
///
/// # Example
///
/// ```rust
/// use algostep::core::{AlgorithmKind, TraceEntry};
/// use chrono::Utc;
///
/// let entry = TraceEntry {
///     step: 1,
///     algorithm: AlgorithmKind::Bubble,
///     from: "start".to_string(),
///     to: "compare".to_string(),
///     message: "So sánh cặp từ đáy lên: 1 và 3".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(entry.to, "compare");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// 1-based index of the advance call that produced this entry
    pub step: u64,
    pub algorithm: AlgorithmKind,
    /// Phase tag before the transition
    pub from: String,
    /// Phase tag after the transition
    pub to: String,
    /// Message emitted by the transition
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of micro-transitions.
///
/// `record` returns a new history and leaves the original untouched.
///
/// # Example
///
/// ```rust
/// use algostep::core::{AlgorithmKind, TraceEntry, TraceHistory};
/// use chrono::Utc;
///
/// let entry = |step: u64, from: &str, to: &str| TraceEntry {
///     step,
///     algorithm: AlgorithmKind::BinarySearch,
///     from: from.to_string(),
///     to: to.to_string(),
///     message: String::new(),
///     timestamp: Utc::now(),
/// };
///
/// let history = TraceHistory::new()
///     .record(entry(1, "start", "calc_mid"))
///     .record(entry(2, "calc_mid", "compare"));
///
/// assert_eq!(history.path(), vec!["start", "calc_mid", "compare"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceHistory {
    entries: Vec<TraceEntry>,
}

impl TraceHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, entry: TraceEntry) -> Self {
        let mut entries = self.entries.clone();
        entries.push(entry);
        Self { entries }
    }

    /// Phase tags traversed: the first `from`, then every `to`.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.entries.first() {
            path.push(first.from.as_str());
        }
        for entry in &self.entries {
            path.push(entry.to.as_str());
        }
        path
    }

    /// Time between the first and last recorded transition.
    ///
    /// Returns `None` for an empty history.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.entries.first()?, self.entries.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many recorded transitions left `phase`.
    pub fn count_from(&self, phase: &str) -> usize {
        self.entries.iter().filter(|e| e.from == phase).count()
    }
}
