//! # physio-coach-core
//!
//! Pose-to-repetition interpretation engine for physiotherapy exercise
//! tracking. Turns per-frame body keypoints from a pose-estimation
//! service into joint angles, form assessments, and a debounced
//! repetition count.
//!
//! The engine is deliberately free of I/O and timers: every update is
//! driven by an explicit pose sample and a caller-supplied millisecond
//! timestamp, so the whole state machine can be unit tested without a
//! camera, a network, or a UI harness.

pub mod engine;
pub mod models;

pub use engine::session::{ExerciseSession, FrameUpdate};
pub use models::exercise::{Exercise, ExerciseProfile};
pub use models::keypoint::{BodySide, Keypoint, Pose};
pub use models::session::{SessionConfig, SessionState, SessionSummary, Stage};
