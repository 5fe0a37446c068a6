//! Session controller.
//!
//! `ExerciseSession` ties the per-frame pieces together: measure the
//! angle, classify form, advance the repetition machine, and track the
//! set/session lifecycle. It performs no I/O and keeps no clock of its
//! own; the caller feeds it poses and timestamps.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::engine::form::{classify_form, NEUTRAL_LABEL};
use crate::engine::reps::{RepCounter, RepSignal};
use crate::engine::side::measure_pose;
use crate::models::exercise::ExerciseProfile;
use crate::models::keypoint::{BodySide, Pose};
use crate::models::session::{RepState, SessionConfig, SessionState, SessionSummary, Stage};

/// What one processed pose changed, for display and logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    pub angle: f32,
    pub side: Option<BodySide>,
    pub stage: Stage,
    pub form_label: &'static str,
    pub rep_counted: bool,
    pub rep_count: u32,
    pub total_reps: u32,
    pub set_completed: bool,
    pub session_ended: bool,
}

/// One live exercise session.
pub struct ExerciseSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    profile: &'static ExerciseProfile,
    config: SessionConfig,
    counter: Option<RepCounter>,
    rep: RepState,
    state: SessionState,
    last_angle: Option<f32>,
    form_label: &'static str,
}

impl ExerciseSession {
    pub fn new(config: SessionConfig) -> Self {
        let profile = ExerciseProfile::for_exercise(config.exercise);
        let counter = profile
            .reps
            .map(|rule| RepCounter::new(rule, config.debounce_ms));
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            profile,
            config,
            counter,
            rep: RepState::default(),
            state: SessionState::default(),
            last_angle: None,
            form_label: NEUTRAL_LABEL,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn profile(&self) -> &'static ExerciseProfile {
        self.profile
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn rep(&self) -> &RepState {
        &self.rep
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn last_angle(&self) -> Option<f32> {
        self.last_angle
    }

    pub fn form_label(&self) -> &'static str {
        self.form_label
    }

    /// Feed one pose sample into the session.
    ///
    /// Returns None while the session is paused between sets, after it
    /// has ended, or when the pose yields no usable angle; in all of
    /// those cases no state is mutated.
    pub fn process_pose(&mut self, pose: &Pose, now_ms: u64) -> Option<FrameUpdate> {
        if !self.state.running || self.state.set_completed || self.state.session_ended {
            return None;
        }

        let measurement = measure_pose(pose, &self.profile.angles, self.config.min_keypoint_score)?;
        self.last_angle = Some(measurement.angle);
        if self.profile.is_bilateral() {
            self.rep.active_side = measurement.side;
        }
        self.form_label = classify_form(&self.profile.form, measurement.angle);

        let mut rep_counted = false;
        if let Some(counter) = &self.counter {
            if counter.observe(&mut self.rep, measurement.angle, now_ms) == RepSignal::Counted {
                rep_counted = true;
                self.rep.rep_count += 1;
                self.rep.total_reps += 1;

                if self.rep.rep_count >= self.config.reps_target {
                    self.complete_set();
                }
            }
        }

        Some(FrameUpdate {
            angle: measurement.angle,
            side: measurement.side,
            stage: self.rep.stage,
            form_label: self.form_label,
            rep_counted,
            rep_count: self.rep.rep_count,
            total_reps: self.rep.total_reps,
            set_completed: self.state.set_completed,
            session_ended: self.state.session_ended,
        })
    }

    fn complete_set(&mut self) {
        self.state.set_completed = true;
        self.state.running = false;
        if self.state.current_set >= self.config.total_sets {
            self.state.session_ended = true;
            tracing::info!(
                session_id = %self.id,
                total_reps = self.rep.total_reps,
                "session complete"
            );
        } else {
            tracing::info!(
                session_id = %self.id,
                set = self.state.current_set,
                "set complete"
            );
        }
    }

    /// Advance to the next set after a set break.
    ///
    /// Only valid while a set is completed and more sets remain;
    /// returns false (and changes nothing) otherwise. The cumulative
    /// rep total survives.
    pub fn start_next_set(&mut self) -> bool {
        if self.state.session_ended
            || !self.state.set_completed
            || self.state.current_set >= self.config.total_sets
        {
            return false;
        }
        self.state.current_set += 1;
        self.state.set_completed = false;
        self.state.running = true;
        self.rep.reset_for_set();
        self.last_angle = None;
        self.form_label = NEUTRAL_LABEL;
        true
    }

    /// Stop the session early, without completing the current set.
    /// Terminal; a no-op if the session already ended.
    pub fn end_session(&mut self) {
        if self.state.session_ended {
            return;
        }
        self.state.running = false;
        self.state.session_ended = true;
        tracing::info!(session_id = %self.id, "session ended early");
    }

    /// Start the whole session over: all counters, the set number, and
    /// the elapsed clock go back to their initial values.
    pub fn redo(&mut self) {
        self.rep = RepState::default();
        self.state = SessionState::default();
        self.last_angle = None;
        self.form_label = NEUTRAL_LABEL;
    }

    /// Advance the elapsed clock by one second. Ignored while paused
    /// or ended.
    pub fn tick_elapsed(&mut self) {
        if self.state.running {
            self.state.elapsed_seconds += 1;
        }
    }

    /// Aggregates for the end-of-session report.
    pub fn summary(&self) -> SessionSummary {
        let total_reps = self.rep.total_reps;
        let duration = self.state.elapsed_seconds;
        let avg_seconds_per_rep = if total_reps > 0 {
            duration as f64 / total_reps as f64
        } else {
            0.0
        };
        let form_score = if self.form_label == NEUTRAL_LABEL {
            0.9
        } else {
            0.7
        };

        SessionSummary {
            session_id: self.id,
            exercise: self.config.exercise,
            started_at: self.started_at,
            total_reps,
            assigned_reps: self.config.assigned_reps(),
            sets: self.config.total_sets,
            duration_seconds: duration,
            avg_seconds_per_rep,
            form_score,
        }
    }
}
