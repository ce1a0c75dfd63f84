//! Session actor tests on a paused clock.

use algostep::autoplay::SpeedPreset;
use algostep::core::{AlgorithmKind, SearchTarget, SearchTargets};
use algostep::narration::{
    MockNarrationClient, MockReply, NarrationGateway, NarrationPolicy, FALLBACK_NARRATION,
    READY_NARRATION,
};
use algostep::session::{Command, Frame, Session, SessionHandle, SessionOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

const PATIENCE: Duration = Duration::from_secs(600);

fn options(algorithm: AlgorithmKind) -> SessionOptions {
    SessionOptions {
        algorithm,
        targets: SearchTargets::default(),
        speed: SpeedPreset::Fast,
        policy: NarrationPolicy::EveryStep,
        discard_stale: true,
    }
}

fn narrated(options: SessionOptions, replies: Vec<MockReply>) -> (SessionHandle, Arc<MockNarrationClient>) {
    let client = Arc::new(MockNarrationClient::scripted(replies));
    let gateway = NarrationGateway::new(client.clone());
    (Session::spawn(options, Some(gateway)), client)
}

async fn wait(handle: &SessionHandle, predicate: impl FnMut(&Frame) -> bool) -> Frame {
    timeout(PATIENCE, handle.wait_for(predicate))
        .await
        .expect("frame never arrived")
        .expect("session closed")
}

#[tokio::test(start_paused = true)]
async fn advance_publishes_step_and_narration() {
    let (handle, client) = narrated(
        options(AlgorithmKind::Bubble),
        vec![MockReply::text("Hai số dưới cùng đang được so sánh.")],
    );

    handle.send(Command::Advance).await.unwrap();
    let frame = wait(&handle, |f| f.step == 1 && !f.narrating).await;

    assert_eq!(frame.snapshot.phase_name(), "compare");
    assert_eq!(frame.narration, "Hai số dưới cùng đang được so sánh.");
    assert!(!frame.controls.edit_target);
    assert_eq!(client.calls(), 1);
    assert!(client.prompts()[0].contains(&frame.snapshot.message));

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn failed_narration_shows_fallback() {
    let (handle, _client) = narrated(options(AlgorithmKind::Selection), vec![MockReply::fail("offline")]);

    handle.send(Command::Advance).await.unwrap();
    let frame = wait(&handle, |f| f.step == 1 && !f.narrating).await;

    assert_eq!(frame.narration, FALLBACK_NARRATION);
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn never_policy_makes_no_requests() {
    let mut opts = options(AlgorithmKind::LinearSearch);
    opts.policy = NarrationPolicy::Never;
    let (handle, client) = narrated(opts, Vec::new());

    for _ in 0..3 {
        handle.send(Command::Advance).await.unwrap();
    }
    let frame = wait(&handle, |f| f.step == 3).await;

    assert_eq!(frame.narration, READY_NARRATION);
    assert!(!frame.narrating);
    assert_eq!(client.calls(), 0);
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn autoplay_runs_to_done_at_preset_pace() {
    let handle = Session::spawn(options(AlgorithmKind::BinarySearch), None);
    let started = Instant::now();

    handle.send(Command::ToggleAutoplay).await.unwrap();
    let frame = wait(&handle, |f| f.snapshot.is_terminal()).await;

    assert_eq!(frame.snapshot.phase_name(), "done");
    assert!(!frame.autoplay);
    assert!(!frame.controls.advance);
    assert!(!frame.controls.toggle_autoplay);
    assert!(frame.controls.reset);

    let minimum = SpeedPreset::Fast.interval() * frame.step as u32;
    assert!(started.elapsed() >= minimum);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn manual_advance_is_ignored_during_autoplay() {
    let handle = Session::spawn(options(AlgorithmKind::Bubble), None);

    handle.send(Command::ToggleAutoplay).await.unwrap();
    handle.send(Command::Advance).await.unwrap();
    let frame = wait(&handle, |f| f.autoplay).await;
    sleep(Duration::from_millis(100)).await;

    assert_eq!(handle.current().step, 0);
    assert!(!frame.controls.advance);

    handle.send(Command::ToggleAutoplay).await.unwrap();
    let paused = wait(&handle, |f| !f.autoplay).await;
    sleep(Duration::from_secs(10)).await;
    assert_eq!(handle.current().step, paused.step);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn selecting_algorithm_stops_autoplay() {
    let handle = Session::spawn(options(AlgorithmKind::Bubble), None);

    handle.send(Command::ToggleAutoplay).await.unwrap();
    wait(&handle, |f| f.step >= 2).await;

    handle
        .send(Command::SelectAlgorithm(AlgorithmKind::LinearSearch))
        .await
        .unwrap();
    let frame = wait(&handle, |f| f.snapshot.kind() == AlgorithmKind::LinearSearch).await;
    assert!(!frame.autoplay);
    assert_eq!(frame.step, 0);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(handle.current().step, 0);
    assert_eq!(handle.current().snapshot.phase_name(), "start");

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn speed_change_applies_to_next_tick() {
    let mut opts = options(AlgorithmKind::Selection);
    opts.speed = SpeedPreset::Slow;
    let handle = Session::spawn(opts, None);
    let started = Instant::now();

    handle.send(Command::ToggleAutoplay).await.unwrap();
    handle.send(Command::SetSpeed(SpeedPreset::Fast)).await.unwrap();
    let frame = wait(&handle, |f| f.step == 1).await;

    assert_eq!(frame.speed, SpeedPreset::Fast);
    assert!(started.elapsed() < SpeedPreset::Slow.interval());
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn reset_discards_in_flight_narration() {
    let (handle, _client) = narrated(
        options(AlgorithmKind::Bubble),
        vec![MockReply::delayed(Duration::from_secs(5), MockReply::text("quá muộn"))],
    );

    handle.send(Command::Advance).await.unwrap();
    let before = wait(&handle, |f| f.step == 1).await;
    assert!(before.narrating);

    handle.send(Command::Reset).await.unwrap();
    let after = wait(&handle, |f| f.step == 0).await;
    assert_ne!(after.session, before.session);
    assert!(!after.narrating);

    sleep(Duration::from_secs(6)).await;
    let frame = handle.current();
    assert_eq!(frame.narration, READY_NARRATION);
    assert_eq!(frame.step, 0);

    handle.shutdown().await.unwrap();
}

async fn two_quick_steps(discard_stale: bool) -> Frame {
    let mut opts = options(AlgorithmKind::Selection);
    opts.discard_stale = discard_stale;
    let (handle, _client) = narrated(
        opts,
        vec![
            MockReply::delayed(Duration::from_secs(3), MockReply::text("cũ")),
            MockReply::delayed(Duration::from_secs(1), MockReply::text("mới")),
        ],
    );

    handle.send(Command::Advance).await.unwrap();
    handle.send(Command::Advance).await.unwrap();
    wait(&handle, |f| f.step == 2).await;

    sleep(Duration::from_secs(4)).await;
    let frame = handle.current();
    handle.shutdown().await.unwrap();
    frame
}

#[tokio::test(start_paused = true)]
async fn late_narration_for_old_step_is_dropped() {
    let frame = two_quick_steps(true).await;
    assert_eq!(frame.narration, "mới");
    assert!(!frame.narrating);
}

#[tokio::test(start_paused = true)]
async fn late_narration_is_kept_when_staleness_is_allowed() {
    let frame = two_quick_steps(false).await;
    assert_eq!(frame.narration, "cũ");
}

#[tokio::test(start_paused = true)]
async fn edited_target_survives_reset_in_session() {
    let handle = Session::spawn(options(AlgorithmKind::BinarySearch), None);

    handle
        .send(Command::EditTarget(SearchTarget::Number(75)))
        .await
        .unwrap();
    let edited = wait(&handle, |f| f.snapshot.message.contains("75")).await;
    assert!(edited.controls.edit_target);

    handle.send(Command::Advance).await.unwrap();
    let moved = wait(&handle, |f| f.step == 1).await;
    assert!(!moved.controls.edit_target);

    handle
        .send(Command::EditTarget(SearchTarget::Number(3)))
        .await
        .unwrap();
    handle.send(Command::Reset).await.unwrap();

    let frame = wait(&handle, |f| f.step == 0).await;
    assert_ne!(frame.session, moved.session);
    assert_eq!(frame.snapshot.message, "Tìm kiếm nhị phân: Tìm số 75 trong dãy.");

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn target_sent_at_later_selection_round_does_not_leak() {
    let handle = Session::spawn(options(AlgorithmKind::Selection), None);

    let mut step = 0;
    loop {
        handle.send(Command::Advance).await.unwrap();
        step += 1;
        let frame = wait(&handle, |f| f.step == step).await;
        if frame.snapshot.phase_name() == "start" {
            assert!(!frame.controls.edit_target);
            break;
        }
    }

    handle
        .send(Command::EditTarget(SearchTarget::Number(4)))
        .await
        .unwrap();
    handle
        .send(Command::SelectAlgorithm(AlgorithmKind::BinarySearch))
        .await
        .unwrap();

    let frame = wait(&handle, |f| f.snapshot.kind() == AlgorithmKind::BinarySearch).await;
    assert_eq!(frame.snapshot.message, "Tìm kiếm nhị phân: Tìm số 32 trong dãy.");

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn toggle_on_finished_run_is_ignored() {
    let handle = Session::spawn(options(AlgorithmKind::LinearSearch), None);
    for _ in 0..40 {
        handle.send(Command::Advance).await.unwrap();
    }
    wait(&handle, |f| f.snapshot.is_terminal()).await;

    handle.send(Command::ToggleAutoplay).await.unwrap();
    sleep(Duration::from_millis(10)).await;
    assert!(!handle.current().autoplay);

    handle.shutdown().await.unwrap();
}
