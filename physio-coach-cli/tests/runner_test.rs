//! Runner loop driven by a scripted frame source and a mock pose
//! service.

use mockito::Matcher;
use serde_json::json;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;

use physio_coach_cli::api::ApiClient;
use physio_coach_cli::camera::{Frame, FrameSource};
use physio_coach_cli::config::Config;
use physio_coach_cli::runner::{run_session, RunnerConfig, SetBreakPolicy};
use physio_coach_cli::ui::LiveDisplay;
use physio_coach_core::{Exercise, ExerciseSession, SessionConfig};

/// Hands out a fixed list of frame payloads, then reports exhaustion.
struct ScriptedSource {
    frames: VecDeque<String>,
}

impl ScriptedSource {
    fn new<const N: usize>(frames: [&str; N]) -> Self {
        Self {
            frames: frames.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Pin<Box<dyn Future<Output = anyhow::Result<Option<Frame>>> + Send + '_>> {
        let next = self.frames.pop_front();
        Box::pin(async move { Ok(next.map(|image_base64| Frame { image_base64 })) })
    }
}

/// Pose JSON with both knees bent to the given angle.
fn pose_body(angle_deg: f32) -> String {
    let theta = (angle_deg - 90.0).to_radians();
    let mut keypoints = Vec::new();
    for prefix in ["left", "right"] {
        keypoints.push(json!({ "name": format!("{prefix}_hip"), "x": 0.5, "y": 0.3, "score": 0.9 }));
        keypoints.push(json!({ "name": format!("{prefix}_knee"), "x": 0.5, "y": 0.5, "score": 0.9 }));
        keypoints.push(json!({
            "name": format!("{prefix}_ankle"),
            "x": 0.5 + 0.2 * theta.cos(),
            "y": 0.5 + 0.2 * theta.sin(),
            "score": 0.9,
        }));
    }
    json!({ "pose": { "keypoints": keypoints } }).to_string()
}

async fn mock_pose(server: &mut mockito::ServerGuard, frame: &str, angle_deg: f32) {
    server
        .mock("POST", "/analyze_frame")
        .match_body(Matcher::PartialJson(json!({ "image_base64": frame })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(pose_body(angle_deg))
        .create_async()
        .await;
}

fn fast_runner_config(set_break: SetBreakPolicy) -> RunnerConfig {
    RunnerConfig {
        tick_interval_ms: 2,
        sample_interval_ms: 2,
        set_break,
    }
}

fn client_for(server: &mockito::ServerGuard) -> ApiClient {
    let mut config = Config::default();
    config.api.base_url = server.url();
    ApiClient::new(&config).unwrap()
}

#[tokio::test]
async fn source_exhaustion_ends_the_session() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/analyze_frame")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let session = ExerciseSession::new(SessionConfig::new(Exercise::Squat, 5, 2));
    let display = LiveDisplay::hidden(&session);
    let source = ScriptedSource::new(["f1", "f2", "f3"]);

    let session = run_session(
        session,
        source,
        client_for(&server),
        fast_runner_config(SetBreakPolicy::EndSession),
        &display,
    )
    .await
    .unwrap();

    assert!(session.state().session_ended);
    assert_eq!(session.rep().total_reps, 0);
}

#[tokio::test]
async fn pose_service_errors_drop_frames_without_state_changes() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/analyze_frame")
        .with_status(500)
        .with_body("boom")
        .expect(2)
        .create_async()
        .await;

    let session = ExerciseSession::new(SessionConfig::new(Exercise::Squat, 5, 1));
    let display = LiveDisplay::hidden(&session);
    let source = ScriptedSource::new(["f1", "f2"]);

    let session = run_session(
        session,
        source,
        client_for(&server),
        fast_runner_config(SetBreakPolicy::EndSession),
        &display,
    )
    .await
    .unwrap();

    // every frame failed, so the machine never left its initial state
    assert!(session.state().session_ended);
    assert_eq!(session.rep().total_reps, 0);
    assert!(session.last_angle().is_none());
}

#[tokio::test]
async fn full_squat_counts_through_the_loop() {
    let mut server = mockito::Server::new_async().await;
    mock_pose(&mut server, "stand", 170.0).await;
    mock_pose(&mut server, "deep", 90.0).await;

    // debounce off so the tight test timing cannot eat the rep
    let config = SessionConfig::new(Exercise::Squat, 1, 1).with_debounce_ms(0);
    let session = ExerciseSession::new(config);
    let display = LiveDisplay::hidden(&session);
    let source = ScriptedSource::new(["stand", "deep"]);

    let session = run_session(
        session,
        source,
        client_for(&server),
        fast_runner_config(SetBreakPolicy::EndSession),
        &display,
    )
    .await
    .unwrap();

    assert!(session.state().session_ended);
    assert_eq!(session.rep().total_reps, 1);
}

#[tokio::test]
async fn auto_continue_runs_every_set() {
    let mut server = mockito::Server::new_async().await;
    mock_pose(&mut server, "s1_stand", 170.0).await;
    mock_pose(&mut server, "s1_deep", 90.0).await;
    mock_pose(&mut server, "s2_stand", 170.0).await;
    mock_pose(&mut server, "s2_deep", 90.0).await;

    let config = SessionConfig::new(Exercise::Squat, 1, 2).with_debounce_ms(0);
    let session = ExerciseSession::new(config);
    let display = LiveDisplay::hidden(&session);
    let source = ScriptedSource::new(["s1_stand", "s1_deep", "s2_stand", "s2_deep"]);

    let session = run_session(
        session,
        source,
        client_for(&server),
        fast_runner_config(SetBreakPolicy::AutoContinue { rest_seconds: 0 }),
        &display,
    )
    .await
    .unwrap();

    assert!(session.state().session_ended);
    assert_eq!(session.state().current_set, 2);
    assert_eq!(session.rep().total_reps, 2);
}

#[tokio::test]
async fn stop_after_set_ends_before_remaining_sets() {
    let mut server = mockito::Server::new_async().await;
    mock_pose(&mut server, "stand", 170.0).await;
    mock_pose(&mut server, "deep", 90.0).await;

    let config = SessionConfig::new(Exercise::Squat, 1, 3).with_debounce_ms(0);
    let session = ExerciseSession::new(config);
    let display = LiveDisplay::hidden(&session);
    let source = ScriptedSource::new(["stand", "deep", "extra_1", "extra_2"]);

    let session = run_session(
        session,
        source,
        client_for(&server),
        fast_runner_config(SetBreakPolicy::EndSession),
        &display,
    )
    .await
    .unwrap();

    assert!(session.state().session_ended);
    assert_eq!(session.state().current_set, 1);
    assert_eq!(session.rep().total_reps, 1);
}
