pub mod exercise;
pub mod keypoint;
pub mod session;

pub use exercise::{AngleSource, Exercise, ExerciseProfile, FormRule, JointTriple, RepRule};
pub use keypoint::{BodySide, Keypoint, Pose};
pub use session::{RepState, SessionConfig, SessionState, SessionSummary, Stage};
