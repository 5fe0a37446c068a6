//! Session state models.
//!
//! `RepState` is the per-exercise mutable state touched exactly once
//! per processed pose sample; `SessionState` tracks lifecycle across
//! sets. Both are plain data so transition logic stays in the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::exercise::Exercise;
use crate::models::keypoint::BodySide;

/// Repetition-machine phase for one exercise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// No phase observed yet (displayed as "-")
    #[default]
    Unset,
    Up,
    Down,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Unset => write!(f, "-"),
            Stage::Up => write!(f, "up"),
            Stage::Down => write!(f, "down"),
        }
    }
}

/// Mutable repetition-tracking state for the active session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepState {
    pub stage: Stage,
    /// Repetitions completed in the current set
    pub rep_count: u32,
    /// Repetitions completed across all sets (survives set changes)
    pub total_reps: u32,
    /// Engine-clock timestamp of the last honored repetition
    pub last_rep_ms: Option<u64>,
    /// Limb selected as representative for a bilateral exercise
    pub active_side: Option<BodySide>,
}

impl RepState {
    /// Reset for a fresh set: the per-set counter and stage go back,
    /// the cumulative total and debounce clock survive.
    pub fn reset_for_set(&mut self) {
        self.stage = Stage::Unset;
        self.rep_count = 0;
    }
}

/// Immutable per-session configuration, supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub exercise: Exercise,
    /// Target repetitions per set (>= 1)
    pub reps_target: u32,
    /// Total sets in the session (>= 1)
    pub total_sets: u32,
    /// Minimum keypoint confidence for a joint to count as present
    pub min_keypoint_score: f32,
    /// Minimum interval between honored repetitions
    pub debounce_ms: u64,
}

impl SessionConfig {
    pub const DEFAULT_MIN_KEYPOINT_SCORE: f32 = 0.4;
    pub const DEFAULT_DEBOUNCE_MS: u64 = 700;

    pub fn new(exercise: Exercise, reps_target: u32, total_sets: u32) -> Self {
        Self {
            exercise,
            reps_target: reps_target.max(1),
            total_sets: total_sets.max(1),
            min_keypoint_score: Self::DEFAULT_MIN_KEYPOINT_SCORE,
            debounce_ms: Self::DEFAULT_DEBOUNCE_MS,
        }
    }

    pub fn with_min_keypoint_score(mut self, min_score: f32) -> Self {
        self.min_keypoint_score = min_score.clamp(0.0, 1.0);
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Repetitions assigned across the whole session.
    pub fn assigned_reps(&self) -> u32 {
        self.reps_target * self.total_sets
    }
}

/// Session lifecycle state.
///
/// `set_completed` and `session_ended` are mutually exclusive with
/// `running = true`; `session_ended` is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub current_set: u32,
    pub elapsed_seconds: u64,
    pub running: bool,
    pub set_completed: bool,
    pub session_ended: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current_set: 1,
            elapsed_seconds: 0,
            running: true,
            set_completed: false,
            session_ended: false,
        }
    }
}

/// Aggregates handed to the report-generation service when a session
/// finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub exercise: Exercise,
    pub started_at: DateTime<Utc>,
    pub total_reps: u32,
    pub assigned_reps: u32,
    pub sets: u32,
    pub duration_seconds: u64,
    /// Average seconds per completed rep (0 when no reps were done)
    pub avg_seconds_per_rep: f64,
    /// Binary-derived form score in [0, 1]
    pub form_score: f64,
}
