//! Algostep: step through classic sorting and searching algorithms one
//! micro-transition at a time.
//!
//! The crate follows a "pure core, imperative shell" split. The core is a
//! step-state machine whose transitions are pure functions over a
//! serializable [`TraceSnapshot`](machine::TraceSnapshot); the shell is a
//! session actor that adds autoplay timing and optional narration of each
//! step by a text generator.
//!
//! # Core Concepts
//!
//! - **Phase**: each algorithm's named states, via the [`Phase`](core::Phase) trait
//! - **Snapshot**: working data, cursor, range, highlight sets and message
//! - **History**: immutable record of every transition taken
//! - **Session**: commands in, frames out, narration on the side
//!
//! # Example
//!
//! ```rust
//! use algostep::core::{AlgorithmKind, SearchTargets};
//! use algostep::machine::{advance, reset};
//!
//! let targets = SearchTargets::default();
//! let start = reset(AlgorithmKind::Bubble, &targets);
//! assert_eq!(start.phase_name(), "start");
//!
//! let next = advance(&start);
//! assert_eq!(next.phase_name(), "compare");
//! assert!(next.highlights.comparing.contains(&3));
//! ```

pub mod algorithms;
pub mod autoplay;
pub mod config;
pub mod core;
pub mod dataset;
pub mod machine;
pub mod narration;
pub mod observability;
pub mod session;

pub use autoplay::{AutoplayScheduler, SpeedPreset};
pub use machine::{advance, apply, reset, trace, Event, Stepper, TraceSnapshot};
pub use narration::{NarrationGateway, NarrationPolicy};
pub use session::{Command, Frame, Session, SessionHandle, SessionOptions};
