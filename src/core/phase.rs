//! Core Phase trait for per-algorithm micro-step tags.
//!
//! Every algorithm declares its own phase vocabulary. The vocabularies are
//! disjoint apart from the shared terminal tag `done`, so each one is a
//! separate enum implementing this trait rather than one shared tag field.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// Trait for algorithm phases.
///
/// All methods are pure. A phase value identifies the next micro-transition
/// an algorithm will perform when advanced.
///
/// # Example
///
/// ```rust
/// use algostep::core::Phase;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
/// enum ScanPhase {
///     Start,
///     Scan,
///     Done,
/// }
///
/// impl Phase for ScanPhase {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Start => "start",
///             Self::Scan => "scan",
///             Self::Done => "done",
///         }
///     }
///
///     fn is_start(&self) -> bool {
///         matches!(self, Self::Start)
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Done)
///     }
/// }
///
/// assert_eq!(ScanPhase::Scan.name(), "scan");
/// assert!(ScanPhase::Done.is_final());
/// ```
pub trait Phase:
    Copy + PartialEq + Eq + Debug + Serialize + DeserializeOwned + Send + Sync
{
    /// The snake_case tag shown to observers (`next_j`, `calc_mid`, ...).
    fn name(&self) -> &'static str;

    /// Check if this is the algorithm's start phase.
    ///
    /// Search targets may only be edited while the machine sits here.
    fn is_start(&self) -> bool;

    /// Check if this is the terminal phase.
    ///
    /// Advancing from a terminal phase is a no-op.
    fn is_final(&self) -> bool;
}
