//! Exercise profiles.
//!
//! Each exercise is described by one static [`ExerciseProfile`]: which
//! joint triples produce its angle, how an angle maps to a form label,
//! and (when the exercise counts repetitions at all) the thresholds of
//! its stage machine. The frame-processing algorithm is parameterized
//! over this data, so adding an exercise is a data-only change.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::keypoint::BodySide;
use crate::models::session::Stage;

/// Exercises supported by the tracking engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exercise {
    Squat,
    BicepCurl,
    ShoulderAbduction,
    KneeExtension,
    LegRaise,
    SideBend,
}

impl Exercise {
    pub const ALL: [Exercise; 6] = [
        Exercise::Squat,
        Exercise::BicepCurl,
        Exercise::ShoulderAbduction,
        Exercise::KneeExtension,
        Exercise::LegRaise,
        Exercise::SideBend,
    ];

    /// Wire key used by the pose and report services.
    pub fn key(&self) -> &'static str {
        match self {
            Exercise::Squat => "squat",
            Exercise::BicepCurl => "bicep_curl",
            Exercise::ShoulderAbduction => "shoulder_abduction",
            Exercise::KneeExtension => "knee_extension",
            Exercise::LegRaise => "leg_raise",
            Exercise::SideBend => "side_bend",
        }
    }

    /// Human-readable exercise name for display and reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Exercise::Squat => "Squats",
            Exercise::BicepCurl => "Bicep Curls",
            Exercise::ShoulderAbduction => "Shoulder Abduction",
            Exercise::KneeExtension => "Knee Extension",
            Exercise::LegRaise => "Leg Raises",
            Exercise::SideBend => "Side Bends",
        }
    }
}

impl std::fmt::Display for Exercise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Error)]
#[error("unknown exercise key: {0}")]
pub struct UnknownExercise(pub String);

impl std::str::FromStr for Exercise {
    type Err = UnknownExercise;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Exercise::ALL
            .iter()
            .copied()
            .find(|e| e.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownExercise(s.to_string()))
    }
}

/// Three joints whose middle point is the vertex of the measured angle.
#[derive(Debug, Clone, Copy)]
pub struct JointTriple {
    pub a: &'static str,
    pub b: &'static str,
    pub c: &'static str,
}

impl JointTriple {
    pub const fn new(a: &'static str, b: &'static str, c: &'static str) -> Self {
        Self { a, b, c }
    }
}

/// How the per-frame angle is obtained for an exercise.
#[derive(Debug, Clone, Copy)]
pub enum AngleSource {
    /// Independent left/right triples; the side with the smaller
    /// ("more flexed") angle is selected each frame, ties to the left.
    Bilateral {
        left: JointTriple,
        right: JointTriple,
    },
    /// All computable triples are averaged; no side selection.
    Averaged { triples: &'static [JointTriple] },
}

/// Angle-to-label rule, evaluated top to bottom, first match wins.
#[derive(Debug, Clone, Copy)]
pub enum FormRule {
    /// Below `low` / above `high` / in between.
    Bands {
        low: f32,
        low_label: &'static str,
        high: f32,
        high_label: &'static str,
        mid_label: &'static str,
    },
    /// Above the threshold is good form.
    AboveIsGood {
        threshold: f32,
        good: &'static str,
        hint: &'static str,
    },
    /// Strictly inside (min, max) is good form.
    WithinRange {
        min: f32,
        max: f32,
        good: &'static str,
        hint: &'static str,
    },
    /// Fallback for exercises without a dedicated rule.
    Generic,
}

/// Stage-machine thresholds for counting repetitions.
///
/// Crossing `arm_above` arms the machine into `arm_stage`; once armed,
/// dropping below `count_below` moves it to `count_stage` and signals
/// a completed repetition.
#[derive(Debug, Clone, Copy)]
pub struct RepRule {
    pub arm_stage: Stage,
    pub arm_above: f32,
    pub count_stage: Stage,
    pub count_below: f32,
}

impl RepRule {
    /// Curl family (bicep_curl, shoulder_abduction): extension arms
    /// "down", flexing past 50 completes the rep "up".
    pub const CURL: RepRule = RepRule {
        arm_stage: Stage::Down,
        arm_above: 150.0,
        count_stage: Stage::Up,
        count_below: 50.0,
    };

    /// Squat family (squat, knee_extension, leg_raise): standing arms
    /// "up", bending past 98 completes the rep "down".
    pub const SQUAT: RepRule = RepRule {
        arm_stage: Stage::Up,
        arm_above: 150.0,
        count_stage: Stage::Down,
        count_below: 98.0,
    };

    /// Side bend: leaning past 40 arms "up", returning under 25
    /// completes the rep "down".
    pub const SIDE_BEND: RepRule = RepRule {
        arm_stage: Stage::Up,
        arm_above: 40.0,
        count_stage: Stage::Down,
        count_below: 25.0,
    };
}

/// Static per-exercise configuration. Immutable for the lifetime of a
/// session; never mutated by live data.
#[derive(Debug, Clone, Copy)]
pub struct ExerciseProfile {
    pub exercise: Exercise,
    pub angles: AngleSource,
    pub form: FormRule,
    /// Rep counting is opt-in; a profile without a rule is
    /// display-only (form labels, no stage machine).
    pub reps: Option<RepRule>,
    /// Joints the display layer should draw for this exercise
    pub tracked_joints: &'static [&'static str],
    /// Skeleton segments the display layer should draw
    pub segments: &'static [(&'static str, &'static str)],
}

const LEFT_LEG: JointTriple = JointTriple::new("left_hip", "left_knee", "left_ankle");
const RIGHT_LEG: JointTriple = JointTriple::new("right_hip", "right_knee", "right_ankle");
const LEFT_ARM: JointTriple = JointTriple::new("left_shoulder", "left_elbow", "left_wrist");
const RIGHT_ARM: JointTriple = JointTriple::new("right_shoulder", "right_elbow", "right_wrist");
const SIDE_BEND_TRIPLES: [JointTriple; 2] = [
    JointTriple::new("left_shoulder", "left_hip", "right_hip"),
    JointTriple::new("right_shoulder", "right_hip", "left_hip"),
];

const LEG_JOINTS: [&str; 6] = [
    "left_hip",
    "left_knee",
    "left_ankle",
    "right_hip",
    "right_knee",
    "right_ankle",
];
const ARM_JOINTS: [&str; 6] = [
    "left_shoulder",
    "left_elbow",
    "left_wrist",
    "right_shoulder",
    "right_elbow",
    "right_wrist",
];
const TORSO_JOINTS: [&str; 4] = ["left_shoulder", "right_shoulder", "left_hip", "right_hip"];

const LEG_SEGMENTS: [(&str, &str); 4] = [
    ("left_hip", "left_knee"),
    ("left_knee", "left_ankle"),
    ("right_hip", "right_knee"),
    ("right_knee", "right_ankle"),
];
const ARM_SEGMENTS: [(&str, &str); 4] = [
    ("left_shoulder", "left_elbow"),
    ("left_elbow", "left_wrist"),
    ("right_shoulder", "right_elbow"),
    ("right_elbow", "right_wrist"),
];
const TORSO_SEGMENTS: [(&str, &str); 2] =
    [("left_shoulder", "left_hip"), ("right_shoulder", "right_hip")];

static SQUAT_PROFILE: ExerciseProfile = ExerciseProfile {
    exercise: Exercise::Squat,
    angles: AngleSource::Bilateral {
        left: LEFT_LEG,
        right: RIGHT_LEG,
    },
    form: FormRule::Bands {
        low: 95.0,
        low_label: "Nice deep squat",
        high: 160.0,
        high_label: "Standing tall",
        mid_label: "Try going a bit lower",
    },
    reps: Some(RepRule::SQUAT),
    tracked_joints: &LEG_JOINTS,
    segments: &LEG_SEGMENTS,
};

static BICEP_CURL_PROFILE: ExerciseProfile = ExerciseProfile {
    exercise: Exercise::BicepCurl,
    angles: AngleSource::Bilateral {
        left: LEFT_ARM,
        right: RIGHT_ARM,
    },
    form: FormRule::Bands {
        low: 70.0,
        low_label: "Great contraction",
        high: 145.0,
        high_label: "Full extension",
        mid_label: "Complete your motion fully",
    },
    reps: Some(RepRule::CURL),
    tracked_joints: &ARM_JOINTS,
    segments: &ARM_SEGMENTS,
};

static SHOULDER_ABDUCTION_PROFILE: ExerciseProfile = ExerciseProfile {
    exercise: Exercise::ShoulderAbduction,
    angles: AngleSource::Bilateral {
        left: LEFT_ARM,
        right: RIGHT_ARM,
    },
    form: FormRule::AboveIsGood {
        threshold: 120.0,
        good: "Good arm raise",
        hint: "Lift higher for full range",
    },
    reps: Some(RepRule::CURL),
    tracked_joints: &ARM_JOINTS,
    segments: &ARM_SEGMENTS,
};

static KNEE_EXTENSION_PROFILE: ExerciseProfile = ExerciseProfile {
    exercise: Exercise::KneeExtension,
    angles: AngleSource::Bilateral {
        left: LEFT_LEG,
        right: RIGHT_LEG,
    },
    form: FormRule::AboveIsGood {
        threshold: 160.0,
        good: "Full knee extension",
        hint: "Straighten knee more",
    },
    reps: Some(RepRule::SQUAT),
    tracked_joints: &LEG_JOINTS,
    segments: &LEG_SEGMENTS,
};

static LEG_RAISE_PROFILE: ExerciseProfile = ExerciseProfile {
    exercise: Exercise::LegRaise,
    angles: AngleSource::Bilateral {
        left: LEFT_LEG,
        right: RIGHT_LEG,
    },
    form: FormRule::AboveIsGood {
        threshold: 140.0,
        good: "Leg raised high enough",
        hint: "Lift leg higher",
    },
    reps: Some(RepRule::SQUAT),
    tracked_joints: &LEG_JOINTS,
    segments: &LEG_SEGMENTS,
};

static SIDE_BEND_PROFILE: ExerciseProfile = ExerciseProfile {
    exercise: Exercise::SideBend,
    angles: AngleSource::Averaged {
        triples: &SIDE_BEND_TRIPLES,
    },
    form: FormRule::WithinRange {
        min: 15.0,
        max: 35.0,
        good: "Nice side bend",
        hint: "Bend slightly more to side",
    },
    reps: Some(RepRule::SIDE_BEND),
    tracked_joints: &TORSO_JOINTS,
    segments: &TORSO_SEGMENTS,
};

impl ExerciseProfile {
    /// Look up the static profile for an exercise.
    pub fn for_exercise(exercise: Exercise) -> &'static ExerciseProfile {
        match exercise {
            Exercise::Squat => &SQUAT_PROFILE,
            Exercise::BicepCurl => &BICEP_CURL_PROFILE,
            Exercise::ShoulderAbduction => &SHOULDER_ABDUCTION_PROFILE,
            Exercise::KneeExtension => &KNEE_EXTENSION_PROFILE,
            Exercise::LegRaise => &LEG_RAISE_PROFILE,
            Exercise::SideBend => &SIDE_BEND_PROFILE,
        }
    }

    /// Whether this profile tracks one limb at a time.
    pub fn is_bilateral(&self) -> bool {
        matches!(self.angles, AngleSource::Bilateral { .. })
    }

    /// Joints to draw, filtered to the active side for bilateral
    /// exercises (display only, no effect on counting).
    pub fn display_joints(&self, side: Option<BodySide>) -> Vec<&'static str> {
        match side {
            Some(side) if self.is_bilateral() => self
                .tracked_joints
                .iter()
                .copied()
                .filter(|j| j.starts_with(side.prefix()))
                .collect(),
            _ => self.tracked_joints.to_vec(),
        }
    }

    /// Segments to draw, filtered like [`Self::display_joints`].
    pub fn display_segments(&self, side: Option<BodySide>) -> Vec<(&'static str, &'static str)> {
        match side {
            Some(side) if self.is_bilateral() => self
                .segments
                .iter()
                .copied()
                .filter(|(a, b)| a.starts_with(side.prefix()) && b.starts_with(side.prefix()))
                .collect(),
            _ => self.segments.to_vec(),
        }
    }
}
