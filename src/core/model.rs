//! Data model shared by every algorithm: kinds, cursors, ranges,
//! highlight sets and search targets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Which algorithm a session is stepping through.
///
/// Selecting a different kind resets every other piece of state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    Bubble,
    Selection,
    LinearSearch,
    BinarySearch,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 4] = [
        AlgorithmKind::Bubble,
        AlgorithmKind::Selection,
        AlgorithmKind::LinearSearch,
        AlgorithmKind::BinarySearch,
    ];

    /// Identifier used in config files, the CLI and narration requests.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Selection => "selection",
            Self::LinearSearch => "linear_search",
            Self::BinarySearch => "binary_search",
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, Self::LinearSearch | Self::BinarySearch)
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when parsing an unknown algorithm identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm '{0}' (expected bubble, selection, linear_search or binary_search)")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for AlgorithmKind {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlgorithmKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

/// One row of the customer table scanned by linear search.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub sequence_number: u32,
    pub name: String,
    pub address: String,
}

/// The data an algorithm works on.
///
/// Only swap transitions mutate it; every reset copies it afresh from the
/// dataset provider.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkingSequence {
    Numbers(Vec<i64>),
    Records(Vec<CustomerRecord>),
}

impl WorkingSequence {
    pub fn len(&self) -> usize {
        match self {
            Self::Numbers(values) => values.len(),
            Self::Records(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numbers(&self) -> Option<&[i64]> {
        match self {
            Self::Numbers(values) => Some(values),
            Self::Records(_) => None,
        }
    }

    pub fn as_records(&self) -> Option<&[CustomerRecord]> {
        match self {
            Self::Records(rows) => Some(rows),
            Self::Numbers(_) => None,
        }
    }
}

/// Pair of working indices whose meaning depends on the algorithm.
///
/// Sorts use `i` as the outer pass and `j` as the inner scan index. Linear
/// search scans with `i`. Binary search leaves both at zero and tracks a
/// [`Range`] instead.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Cursor {
    pub i: usize,
    pub j: usize,
}

impl Cursor {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

/// Inclusive `[low, high]` window and its midpoint, for binary search.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Range {
    pub low: usize,
    pub high: usize,
    pub mid: usize,
}

impl Range {
    /// The full window over a sequence of `len` elements.
    ///
    /// `len` must be non-zero.
    pub fn spanning(len: usize) -> Self {
        let high = len - 1;
        Self {
            low: 0,
            high,
            mid: high / 2,
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.low <= index && index <= self.high
    }
}

/// Index sets used by renderers to colour elements.
///
/// `comparing` and `swapping` are the active sets: an index is never in
/// both. `sorted` (which doubles as the found marker for searches) and
/// `discarded` accumulate independently.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct HighlightSets {
    pub comparing: BTreeSet<usize>,
    pub swapping: BTreeSet<usize>,
    pub sorted: BTreeSet<usize>,
    pub discarded: BTreeSet<usize>,
}

impl HighlightSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.comparing.is_empty()
            && self.swapping.is_empty()
            && self.sorted.is_empty()
            && self.discarded.is_empty()
    }

    /// Replace the comparing set, pulling those indices out of `swapping`.
    pub fn compare<I: IntoIterator<Item = usize>>(&mut self, indices: I) {
        self.comparing = indices.into_iter().collect();
        let comparing = &self.comparing;
        self.swapping.retain(|index| !comparing.contains(index));
    }

    /// Replace the swapping set, pulling those indices out of `comparing`.
    pub fn swap<I: IntoIterator<Item = usize>>(&mut self, indices: I) {
        self.swapping = indices.into_iter().collect();
        let swapping = &self.swapping;
        self.comparing.retain(|index| !swapping.contains(index));
    }

    pub fn clear_comparing(&mut self) {
        self.comparing.clear();
    }

    pub fn clear_swapping(&mut self) {
        self.swapping.clear();
    }

    pub fn mark_sorted(&mut self, index: usize) {
        self.sorted.insert(index);
    }

    pub fn mark_all_sorted(&mut self, len: usize) {
        self.sorted = (0..len).collect();
    }

    /// Make `index` the only member of the sorted/found set.
    pub fn mark_found(&mut self, index: usize) {
        self.sorted = BTreeSet::from([index]);
    }

    /// Discard every index in the inclusive range `from..=to`.
    pub fn discard(&mut self, from: usize, to: usize) {
        self.discarded.extend(from..=to);
    }
}

/// A value to look for, edited from outside the machine.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTarget {
    /// Customer name for linear search, matched case-insensitively.
    Name(String),
    /// Number for binary search.
    Number(i64),
}

impl SearchTarget {
    /// Whether this target is meaningful for `kind`.
    pub fn applies_to(&self, kind: AlgorithmKind) -> bool {
        matches!(
            (self, kind),
            (Self::Name(_), AlgorithmKind::LinearSearch)
                | (Self::Number(_), AlgorithmKind::BinarySearch)
        )
    }
}

/// The remembered targets for both searches.
///
/// Each search kind reads only its own field, so switching algorithms
/// keeps whatever the user last typed for the other one.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SearchTargets {
    pub name: String,
    pub number: i64,
}

impl SearchTargets {
    pub fn new(name: impl Into<String>, number: i64) -> Self {
        Self {
            name: name.into(),
            number,
        }
    }

    /// Store `target` in the matching field.
    pub fn set(&mut self, target: SearchTarget) {
        match target {
            SearchTarget::Name(name) => self.name = name,
            SearchTarget::Number(number) => self.number = number,
        }
    }
}

impl Default for SearchTargets {
    fn default() -> Self {
        Self::new("Hoàng Mai", 32)
    }
}
