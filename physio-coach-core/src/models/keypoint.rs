//! Pose and keypoint wire models.
//!
//! One `Pose` is a single frame's worth of detections from the remote
//! pose-estimation service. Poses carry no identity across frames; the
//! engine keeps all temporal state explicitly in
//! [`crate::models::session::RepState`].

use serde::{Deserialize, Serialize};

/// A named anatomical landmark with normalized position and confidence.
///
/// Upstream services label keypoints inconsistently (`name`, `part`,
/// `bodyPart`, `joint_name`) and sometimes call the score `confidence`;
/// the serde aliases accept all of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keypoint {
    #[serde(alias = "part", alias = "bodyPart", alias = "joint_name")]
    pub name: String,
    /// X coordinate, normalized to [0, 1]
    pub x: f32,
    /// Y coordinate, normalized to [0, 1]
    pub y: f32,
    /// Detection confidence in [0, 1]
    #[serde(default, alias = "confidence")]
    pub score: f32,
}

impl Keypoint {
    pub fn new(name: impl Into<String>, x: f32, y: f32, score: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            score,
        }
    }

    /// Whether this keypoint is confident enough to feed the engine.
    pub fn is_usable(&self, min_score: f32) -> bool {
        self.score >= min_score
    }
}

/// All keypoints detected in one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    /// Case-insensitive lookup of a joint by name. Never panics; a
    /// missing joint is an expected condition the caller must handle.
    pub fn keypoint(&self, name: &str) -> Option<&Keypoint> {
        self.keypoints
            .iter()
            .find(|kp| kp.name.eq_ignore_ascii_case(name))
    }
}

/// The limb currently tracked for a bilateral exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodySide {
    Left,
    Right,
}

impl BodySide {
    /// Joint-name prefix for this side ("left_" / "right_").
    pub fn prefix(&self) -> &'static str {
        match self {
            BodySide::Left => "left_",
            BodySide::Right => "right_",
        }
    }
}

impl std::fmt::Display for BodySide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodySide::Left => write!(f, "left"),
            BodySide::Right => write!(f, "right"),
        }
    }
}
