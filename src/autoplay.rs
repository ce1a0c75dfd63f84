//! Autoplay scheduler: at most one pending tick at a time.
//!
//! Each armed tick carries the generation it was armed under. Stopping or
//! re-arming bumps the generation, so a tick that was already in flight
//! when the scheduler changed its mind is rejected by [`AutoplayScheduler::accept`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Named autoplay intervals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedPreset {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl SpeedPreset {
    pub const ALL: [SpeedPreset; 3] = [Self::Slow, Self::Normal, Self::Fast];

    pub fn interval(self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(2000),
            Self::Normal => Duration::from_millis(1200),
            Self::Fast => Duration::from_millis(600),
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
        }
    }
}

impl fmt::Display for SpeedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown speed preset: {0} (expected slow, normal or fast)")]
pub struct UnknownSpeed(pub String);

impl FromStr for SpeedPreset {
    type Err = UnknownSpeed;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSpeed(s.to_string()))
    }
}

/// A fired timer, tagged with the generation it was armed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    generation: u64,
}

/// One-shot timer chain driving autoplay.
///
/// The owner calls [`schedule_next`](Self::schedule_next) after handling
/// each accepted tick, which keeps ticks from piling up behind a slow
/// consumer.
#[derive(Debug)]
pub struct AutoplayScheduler {
    ticks: mpsc::UnboundedSender<Tick>,
    interval: Duration,
    active: bool,
    generation: u64,
    pending: Option<CancellationToken>,
}

impl AutoplayScheduler {
    pub fn new(ticks: mpsc::UnboundedSender<Tick>, interval: Duration) -> Self {
        Self {
            ticks,
            interval,
            active: false,
            generation: 0,
            pending: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Turn autoplay on and arm the first tick.
    pub fn start(&mut self) {
        self.active = true;
        self.schedule_next();
    }

    /// Turn autoplay off and cancel any pending tick.
    pub fn stop(&mut self) {
        self.active = false;
        self.cancel_pending();
    }

    /// Change the interval. A pending tick is re-armed with the new one.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
        if self.active && self.pending.is_some() {
            self.schedule_next();
        }
    }

    /// Arm one tick after the current interval, replacing any pending one.
    /// Does nothing while inactive.
    pub fn schedule_next(&mut self) {
        if !self.active {
            return;
        }
        self.cancel_pending();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let ticks = self.ticks.clone();
        let tick = Tick {
            generation: self.generation,
        };
        let interval = self.interval;

        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(interval) => {
                    let _ = ticks.send(tick);
                }
            }
        });

        self.pending = Some(token);
    }

    /// Whether `tick` is the one currently armed. Accepting it clears the
    /// pending slot; the caller re-arms with [`schedule_next`](Self::schedule_next).
    pub fn accept(&mut self, tick: Tick) -> bool {
        if !self.active || self.pending.is_none() || tick.generation != self.generation {
            debug!(
                tick = tick.generation,
                current = self.generation,
                "stale autoplay tick discarded"
            );
            return false;
        }
        self.pending = None;
        true
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
        self.generation += 1;
    }
}

impl Drop for AutoplayScheduler {
    fn drop(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}
