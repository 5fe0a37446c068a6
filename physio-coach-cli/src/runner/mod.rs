//! Capture/analyze/update loop.
//!
//! Logically single-threaded: one `tokio::select!` loop owns the
//! session, so no state is ever touched concurrently. A frame ticker
//! proposes capture cycles; at most one cycle (capture, POST to the
//! pose service, process the result) is in flight at a time, held in
//! an explicit slot. Ticks that arrive while the slot is occupied, or
//! sooner than the sampling interval allows, are dropped outright.
//! Backpressure therefore degrades the sampling rate, never the
//! latency of what does get processed.

use anyhow::Result;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};

use physio_coach_core::{ExerciseSession, Pose};

use crate::api::ApiClient;
use crate::camera::FrameSource;
use crate::ui::LiveDisplay;

/// What to do when a set completes and more sets remain.
#[derive(Debug, Clone, Copy)]
pub enum SetBreakPolicy {
    /// Rest, then move on to the next set automatically.
    AutoContinue { rest_seconds: u64 },
    /// Stop after the current set.
    EndSession,
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub tick_interval_ms: u64,
    pub sample_interval_ms: u64,
    pub set_break: SetBreakPolicy,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            sample_interval_ms: 300,
            set_break: SetBreakPolicy::AutoContinue { rest_seconds: 5 },
        }
    }
}

/// Result of one capture cycle. The frame source travels through the
/// cycle future and comes back with the outcome.
enum CycleOutcome {
    Pose(Pose),
    /// Capture or analysis failed; logged, nothing to process.
    Skipped,
    /// The frame source has no more frames.
    Exhausted,
}

async fn run_cycle<S: FrameSource>(
    mut source: S,
    client: ApiClient,
    exercise_key: String,
) -> (S, CycleOutcome) {
    let frame = match source.next_frame().await {
        Ok(Some(frame)) => frame,
        Ok(None) => return (source, CycleOutcome::Exhausted),
        Err(e) => {
            tracing::warn!(error = %e, "frame capture failed");
            return (source, CycleOutcome::Skipped);
        }
    };

    match client.analyze_frame(&frame.image_base64, &exercise_key).await {
        Ok(pose) => (source, CycleOutcome::Pose(pose)),
        Err(e) => {
            // no retry: the next tick brings a fresher frame anyway
            tracing::debug!(error = %e, "frame analysis failed, dropping frame");
            (source, CycleOutcome::Skipped)
        }
    }
}

type CycleSlot<S> = Option<Pin<Box<dyn Future<Output = (S, CycleOutcome)> + Send>>>;

async fn await_slot<S>(slot: &mut CycleSlot<S>) -> (S, CycleOutcome) {
    match slot.as_mut() {
        Some(cycle) => cycle.await,
        None => std::future::pending().await,
    }
}

/// Drive a session until it ends.
///
/// Ends when the rep target of the final set is reached, the frame
/// source runs out, the set-break policy says stop, or Ctrl-C arrives.
/// The tickers die with the loop, so nothing can touch the session
/// afterwards.
pub async fn run_session<S: FrameSource>(
    mut session: ExerciseSession,
    source: S,
    client: ApiClient,
    config: RunnerConfig,
    display: &LiveDisplay,
) -> Result<ExerciseSession> {
    let exercise_key = session.config().exercise.key().to_string();
    let started = Instant::now();

    let mut frame_tick = interval(Duration::from_millis(config.tick_interval_ms.max(1)));
    frame_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut second_tick = interval(Duration::from_secs(1));
    second_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut idle_source = Some(source);
    let mut slot: CycleSlot<S> = None;
    let mut last_sample_ms: Option<u64> = None;

    tracing::info!(
        session_id = %session.id(),
        exercise = %session.config().exercise,
        "session started"
    );

    while !session.state().session_ended {
        tokio::select! {
            _ = frame_tick.tick() => {
                // single-slot backpressure: a tick with a cycle in
                // flight is dropped, never queued
                let Some(source) = idle_source.take() else {
                    continue;
                };

                let now_ms = started.elapsed().as_millis() as u64;
                let due = last_sample_ms
                    .map_or(true, |last| now_ms.saturating_sub(last) >= config.sample_interval_ms);
                if !due {
                    idle_source = Some(source);
                    continue;
                }

                last_sample_ms = Some(now_ms);
                slot = Some(Box::pin(run_cycle(
                    source,
                    client.clone(),
                    exercise_key.clone(),
                )));
            }

            (source, outcome) = await_slot(&mut slot) => {
                slot = None;
                idle_source = Some(source);

                match outcome {
                    CycleOutcome::Pose(pose) => {
                        let now_ms = started.elapsed().as_millis() as u64;
                        if let Some(update) = session.process_pose(&pose, now_ms) {
                            display.frame(&update);

                            if update.set_completed && !update.session_ended {
                                display.set_break(&session);
                                match config.set_break {
                                    SetBreakPolicy::AutoContinue { rest_seconds } => {
                                        let rested = rest_or_cancel(rest_seconds, async {
                                            let _ = (&mut ctrl_c).await;
                                        })
                                        .await;
                                        if !rested {
                                            tracing::info!("interrupted during set break, ending session");
                                            session.end_session();
                                        } else if session.start_next_set() {
                                            display.next_set(&session);
                                        }
                                    }
                                    SetBreakPolicy::EndSession => session.end_session(),
                                }
                            }
                        }
                    }
                    CycleOutcome::Skipped => {}
                    CycleOutcome::Exhausted => {
                        tracing::info!("frame source exhausted, ending session");
                        session.end_session();
                    }
                }
            }

            _ = second_tick.tick() => {
                session.tick_elapsed();
                display.tick(&session);
            }

            _ = &mut ctrl_c => {
                tracing::info!("interrupted, ending session");
                session.end_session();
            }
        }
    }

    Ok(session)
}

/// Wait out the between-set rest, unless cancellation arrives first.
/// Returns false when cancelled so the caller can end the session
/// instead of starting the next set.
async fn rest_or_cancel(rest_seconds: u64, cancel: impl Future<Output = ()>) -> bool {
    if rest_seconds == 0 {
        return true;
    }
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(rest_seconds)) => true,
        _ = cancel => false,
    }
}
