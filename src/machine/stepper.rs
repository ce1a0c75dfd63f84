//! Stateful stepper that tracks step count, session identity and history.

use super::{apply, reset, Event, TraceSnapshot};
use crate::core::{AlgorithmKind, SearchTarget, SearchTargets, TraceEntry, TraceHistory};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

/// Result of a single advance call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// One micro-transition happened
    Transitioned {
        from: &'static str,
        to: &'static str,
    },

    /// The machine was already terminal; nothing changed
    Unchanged,
}

/// Holds the current snapshot plus everything needed to tell one session
/// and one step apart from the next.
///
/// Each reset mints a new session id, which lets asynchronous observers
/// recognise results that belong to a run that no longer exists.
#[derive(Clone, Debug)]
pub struct Stepper {
    current: TraceSnapshot,
    targets: SearchTargets,
    history: TraceHistory,
    step: u64,
    session: Uuid,
}

impl Stepper {
    pub fn new(kind: AlgorithmKind, targets: SearchTargets) -> Self {
        Self {
            current: reset(kind, &targets),
            targets,
            history: TraceHistory::new(),
            step: 0,
            session: Uuid::new_v4(),
        }
    }

    pub fn snapshot(&self) -> &TraceSnapshot {
        &self.current
    }

    pub fn kind(&self) -> AlgorithmKind {
        self.current.kind()
    }

    pub fn targets(&self) -> &SearchTargets {
        &self.targets
    }

    pub fn history(&self) -> &TraceHistory {
        &self.history
    }

    /// Number of transitions since the last reset.
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn session_id(&self) -> Uuid {
        self.session
    }

    pub fn is_final(&self) -> bool {
        self.current.is_terminal()
    }

    /// Throw the current run away and start `kind` from scratch.
    pub fn reset(&mut self, kind: AlgorithmKind) {
        self.current = apply(
            &self.current,
            &Event::Reset {
                kind,
                targets: self.targets.clone(),
            },
        );
        self.history = TraceHistory::new();
        self.step = 0;
        self.session = Uuid::new_v4();
        info!(algorithm = %kind, session = %self.session, "stepper reset");
    }

    /// Change a search target.
    ///
    /// Only honoured before the first step of a search, and only for the
    /// target kind that search uses; the value is then remembered for later
    /// resets as well. Returns whether the edit was accepted.
    pub fn edit_target(&mut self, target: SearchTarget) -> bool {
        if self.step != 0 || !self.current.is_at_start() {
            debug!(
                phase = self.current.phase_name(),
                step = self.step,
                "target edit ignored after stepping began"
            );
            return false;
        }
        if !target.applies_to(self.kind()) {
            debug!(algorithm = %self.kind(), "target edit ignored for algorithm without that target");
            return false;
        }
        self.current = apply(
            &self.current,
            &Event::EditTarget {
                target: target.clone(),
            },
        );
        self.targets.set(target);
        true
    }

    /// Execute one micro-transition and record it.
    pub fn advance(&mut self) -> StepResult {
        let from = self.current.phase_name();
        if !self.current.step() {
            return StepResult::Unchanged;
        }
        let to = self.current.phase_name();
        self.step += 1;

        debug!(
            algorithm = %self.kind(),
            step = self.step,
            from,
            to,
            "advanced"
        );

        self.history = self.history.record(TraceEntry {
            step: self.step,
            algorithm: self.kind(),
            from: from.to_string(),
            to: to.to_string(),
            message: self.current.message.clone(),
            timestamp: Utc::now(),
        });

        StepResult::Transitioned { from, to }
    }
}
