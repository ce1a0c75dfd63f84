//! Session: the single thread of control around a [`Stepper`].
//!
//! A session is an actor task. Commands arrive on an mpsc channel, autoplay
//! ticks and narration results arrive on internal channels, and every
//! handled input publishes a fresh [`Frame`] on a watch channel. Narration
//! runs in spawned tasks and never blocks stepping; its results carry a
//! ticket so that text for an abandoned run or an old step is dropped.

use crate::autoplay::{AutoplayScheduler, SpeedPreset, Tick};
use crate::core::{AlgorithmKind, SearchTarget, SearchTargets};
use crate::machine::{StepResult, Stepper, TraceSnapshot};
use crate::narration::{NarrationGateway, NarrationPolicy, NarrationRequest, READY_NARRATION};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session is no longer running")]
    Closed,

    #[error("Session task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// User intents accepted by a running session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Advance,
    ToggleAutoplay,
    Reset,
    SelectAlgorithm(AlgorithmKind),
    EditTarget(SearchTarget),
    SetSpeed(SpeedPreset),
    Shutdown,
}

/// Which user controls are currently usable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub advance: bool,
    pub toggle_autoplay: bool,
    pub reset: bool,
    pub edit_target: bool,
}

impl Controls {
    pub fn for_state(snapshot: &TraceSnapshot, autoplay: bool) -> Self {
        let terminal = snapshot.is_terminal();
        Self {
            advance: !terminal && !autoplay,
            toggle_autoplay: !terminal,
            reset: true,
            edit_target: snapshot.is_at_start() && snapshot.kind().is_search(),
        }
    }
}

/// Everything a presentation layer needs to draw one moment of a session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    pub session: Uuid,
    pub step: u64,
    pub snapshot: TraceSnapshot,
    pub narration: String,
    pub narrating: bool,
    pub autoplay: bool,
    pub speed: SpeedPreset,
    pub controls: Controls,
}

/// Identifies which run and which step a narration result belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct NarrationTicket {
    session: Uuid,
    step: u64,
}

/// Startup parameters for a session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionOptions {
    pub algorithm: AlgorithmKind,
    pub targets: SearchTargets,
    pub speed: SpeedPreset,
    pub policy: NarrationPolicy,
    /// Drop narration text whose step is no longer the current one
    pub discard_stale: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmKind::Selection,
            targets: SearchTargets::default(),
            speed: SpeedPreset::default(),
            policy: NarrationPolicy::EveryStep,
            discard_stale: true,
        }
    }
}

pub struct Session {
    stepper: Stepper,
    scheduler: AutoplayScheduler,
    speed: SpeedPreset,
    gateway: Option<NarrationGateway>,
    policy: NarrationPolicy,
    discard_stale: bool,
    narration: String,
    awaiting: Option<NarrationTicket>,
    ticks: mpsc::UnboundedReceiver<Tick>,
    narrations_tx: mpsc::UnboundedSender<(NarrationTicket, String)>,
    narrations: mpsc::UnboundedReceiver<(NarrationTicket, String)>,
    frames: watch::Sender<Frame>,
}

impl Session {
    /// Build a session and the receiver its frames are published on.
    ///
    /// Without a gateway no narration is ever requested.
    pub fn new(
        options: SessionOptions,
        gateway: Option<NarrationGateway>,
    ) -> (Self, watch::Receiver<Frame>) {
        let (tick_tx, ticks) = mpsc::unbounded_channel();
        let (narrations_tx, narrations) = mpsc::unbounded_channel();
        let stepper = Stepper::new(options.algorithm, options.targets);
        let scheduler = AutoplayScheduler::new(tick_tx, options.speed.interval());

        let first = Frame {
            session: stepper.session_id(),
            step: 0,
            controls: Controls::for_state(stepper.snapshot(), false),
            snapshot: stepper.snapshot().clone(),
            narration: READY_NARRATION.to_string(),
            narrating: false,
            autoplay: false,
            speed: options.speed,
        };
        let (frames, frames_rx) = watch::channel(first);

        let session = Self {
            stepper,
            scheduler,
            speed: options.speed,
            gateway,
            policy: options.policy,
            discard_stale: options.discard_stale,
            narration: READY_NARRATION.to_string(),
            awaiting: None,
            ticks,
            narrations_tx,
            narrations,
            frames,
        };
        (session, frames_rx)
    }

    /// Spawn the actor on the current runtime.
    pub fn spawn(options: SessionOptions, gateway: Option<NarrationGateway>) -> SessionHandle {
        let (session, frames) = Self::new(options, gateway);
        let (commands, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(session.run(commands_rx));
        SessionHandle {
            commands,
            frames,
            task,
        }
    }

    /// Process inputs until `Shutdown` or until every command sender is gone.
    ///
    /// Narration results are drained before ticks and ticks before
    /// commands, so a queued reset never races ahead of text it is meant
    /// to invalidate.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        info!(
            algorithm = %self.stepper.kind(),
            session = %self.stepper.session_id(),
            "session started"
        );

        loop {
            tokio::select! {
                biased;
                Some((ticket, text)) = self.narrations.recv() => self.on_narration(ticket, text),
                Some(tick) = self.ticks.recv() => self.on_tick(tick),
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
            }
            self.publish();
        }

        self.scheduler.stop();
        info!(session = %self.stepper.session_id(), "session stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Advance => {
                if self.scheduler.is_active() {
                    debug!("manual advance ignored while autoplay runs");
                    return;
                }
                self.step_once();
            }
            Command::ToggleAutoplay => self.toggle_autoplay(),
            Command::Reset => {
                let kind = self.stepper.kind();
                self.reset_to(kind);
            }
            Command::SelectAlgorithm(kind) => {
                info!(algorithm = %kind, "algorithm selected");
                self.reset_to(kind);
            }
            Command::EditTarget(target) => {
                self.stepper.edit_target(target);
            }
            Command::SetSpeed(speed) => {
                self.speed = speed;
                self.scheduler.set_interval(speed.interval());
                debug!(speed = %speed, "speed changed");
            }
            Command::Shutdown => {}
        }
    }

    fn toggle_autoplay(&mut self) {
        if self.scheduler.is_active() {
            self.scheduler.stop();
            info!(step = self.stepper.step(), "autoplay paused");
        } else if self.stepper.is_final() {
            debug!("autoplay not started on a finished run");
        } else {
            self.scheduler.start();
            info!(speed = %self.speed, "autoplay started");
        }
    }

    fn on_tick(&mut self, tick: Tick) {
        if !self.scheduler.accept(tick) {
            return;
        }
        self.step_once();
        if self.stepper.is_final() {
            self.scheduler.stop();
            info!(steps = self.stepper.step(), "autoplay reached the end");
        } else {
            self.scheduler.schedule_next();
        }
    }

    fn reset_to(&mut self, kind: AlgorithmKind) {
        self.scheduler.stop();
        self.stepper.reset(kind);
        self.narration = READY_NARRATION.to_string();
        self.awaiting = None;
    }

    fn step_once(&mut self) {
        if let StepResult::Transitioned { .. } = self.stepper.advance() {
            self.request_narration();
        }
    }

    fn request_narration(&mut self) {
        let Some(gateway) = self.gateway.clone() else {
            return;
        };
        let step = self.stepper.step();
        if !self.policy.should_narrate(step) {
            return;
        }

        let ticket = NarrationTicket {
            session: self.stepper.session_id(),
            step,
        };
        let request = NarrationRequest::from_snapshot(self.stepper.snapshot());
        let results = self.narrations_tx.clone();
        self.awaiting = Some(ticket);

        tokio::spawn(async move {
            let text = gateway.explain(&request).await;
            let _ = results.send((ticket, text));
        });
    }

    fn on_narration(&mut self, ticket: NarrationTicket, text: String) {
        if self.awaiting == Some(ticket) {
            self.awaiting = None;
        }
        if ticket.session != self.stepper.session_id() {
            debug!(session = %ticket.session, "narration for an abandoned run discarded");
            return;
        }
        if self.discard_stale && ticket.step != self.stepper.step() {
            debug!(
                for_step = ticket.step,
                current = self.stepper.step(),
                "stale narration discarded"
            );
            return;
        }
        self.narration = text;
    }

    fn frame(&self) -> Frame {
        let snapshot = self.stepper.snapshot();
        let autoplay = self.scheduler.is_active();
        Frame {
            session: self.stepper.session_id(),
            step: self.stepper.step(),
            snapshot: snapshot.clone(),
            narration: self.narration.clone(),
            narrating: self.awaiting.is_some(),
            autoplay,
            speed: self.speed,
            controls: Controls::for_state(snapshot, autoplay),
        }
    }

    fn publish(&self) {
        self.frames.send_replace(self.frame());
    }
}

/// Client side of a spawned session.
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    frames: watch::Receiver<Frame>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// A receiver that observes every published frame from now on.
    pub fn frames(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    /// The latest published frame.
    pub fn current(&self) -> Frame {
        self.frames.borrow().clone()
    }

    /// Wait until a published frame satisfies `predicate`.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&Frame) -> bool,
    ) -> Result<Frame, SessionError> {
        let mut frames = self.frames.clone();
        let frame = frames
            .wait_for(predicate)
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(frame.clone())
    }

    /// Ask the actor to stop and wait for it to finish.
    pub async fn shutdown(self) -> Result<(), SessionError> {
        let _ = self.commands.send(Command::Shutdown).await;
        self.task.await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{advance, reset};

    #[test]
    fn controls_follow_phase_and_autoplay() {
        let targets = SearchTargets::default();
        let start = reset(AlgorithmKind::BinarySearch, &targets);

        let idle = Controls::for_state(&start, false);
        assert!(idle.advance && idle.toggle_autoplay && idle.reset && idle.edit_target);

        let sort = Controls::for_state(&reset(AlgorithmKind::Bubble, &targets), false);
        assert!(!sort.edit_target);

        let playing = Controls::for_state(&start, true);
        assert!(!playing.advance);
        assert!(playing.toggle_autoplay);

        let moved = Controls::for_state(&advance(&start), false);
        assert!(!moved.edit_target);
    }

    #[test]
    fn controls_at_done_only_allow_reset() {
        let done = crate::machine::trace(AlgorithmKind::LinearSearch, &SearchTargets::default())
            .pop()
            .unwrap();
        let controls = Controls::for_state(&done, false);
        assert_eq!(
            controls,
            Controls {
                advance: false,
                toggle_autoplay: false,
                reset: true,
                edit_target: false,
            }
        );
    }

    #[tokio::test]
    async fn new_session_publishes_ready_frame() {
        let (_session, frames) = Session::new(SessionOptions::default(), None);
        let frame = frames.borrow().clone();
        assert_eq!(frame.step, 0);
        assert_eq!(frame.narration, READY_NARRATION);
        assert_eq!(frame.snapshot.kind(), AlgorithmKind::Selection);
        assert!(!frame.autoplay);
    }
}
