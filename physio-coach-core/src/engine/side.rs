//! Per-frame angle measurement and side selection.

use crate::engine::geometry::angle_at;
use crate::models::exercise::{AngleSource, JointTriple};
use crate::models::keypoint::{BodySide, Pose};

/// One frame's measured angle, plus the limb it was taken from for
/// bilateral exercises.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub angle: f32,
    pub side: Option<BodySide>,
}

/// Angle for one joint triple, or None if any of its three joints is
/// missing or below the confidence threshold. Never fabricates a
/// value for an incomplete triple.
fn triple_angle(pose: &Pose, triple: &JointTriple, min_score: f32) -> Option<f32> {
    let a = pose.keypoint(triple.a).filter(|kp| kp.is_usable(min_score))?;
    let b = pose.keypoint(triple.b).filter(|kp| kp.is_usable(min_score))?;
    let c = pose.keypoint(triple.c).filter(|kp| kp.is_usable(min_score))?;
    Some(angle_at(a, b, c))
}

/// Measure the exercise angle for one frame.
///
/// Bilateral sources pick the side with the smaller angle (the more
/// flexed limb), ties to the left; a side with an incomplete triple is
/// unavailable. Averaged sources take the arithmetic mean over however
/// many triples are computable. Returns None when no angle can be
/// computed — the caller discards the frame with no state mutation.
pub fn measure_pose(pose: &Pose, source: &AngleSource, min_score: f32) -> Option<Measurement> {
    match source {
        AngleSource::Bilateral { left, right } => {
            let left_angle = triple_angle(pose, left, min_score);
            let right_angle = triple_angle(pose, right, min_score);

            match (left_angle, right_angle) {
                (Some(l), Some(r)) if l <= r => Some(Measurement {
                    angle: l,
                    side: Some(BodySide::Left),
                }),
                (_, Some(r)) => Some(Measurement {
                    angle: r,
                    side: Some(BodySide::Right),
                }),
                (Some(l), None) => Some(Measurement {
                    angle: l,
                    side: Some(BodySide::Left),
                }),
                (None, None) => None,
            }
        }
        AngleSource::Averaged { triples } => {
            let angles: Vec<f32> = triples
                .iter()
                .filter_map(|t| triple_angle(pose, t, min_score))
                .collect();
            if angles.is_empty() {
                return None;
            }
            Some(Measurement {
                angle: angles.iter().sum::<f32>() / angles.len() as f32,
                side: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::keypoint::Keypoint;

    const MIN_SCORE: f32 = 0.4;

    const SHOULDER_HIP_TRIPLES: [JointTriple; 2] = [
        JointTriple::new("left_shoulder", "left_hip", "right_hip"),
        JointTriple::new("right_shoulder", "right_hip", "left_hip"),
    ];

    // Lay the three joints out so the knee angle is exactly `angle_deg`.
    fn leg(prefix: &str, angle_deg: f32, score: f32) -> Vec<Keypoint> {
        let (kx, ky) = (0.5, 0.5);
        let theta = (angle_deg - 90.0).to_radians();
        vec![
            Keypoint::new(format!("{prefix}_hip"), kx, ky - 0.2, score),
            Keypoint::new(format!("{prefix}_knee"), kx, ky, score),
            Keypoint::new(
                format!("{prefix}_ankle"),
                kx + 0.2 * theta.cos(),
                ky + 0.2 * theta.sin(),
                score,
            ),
        ]
    }

    fn bilateral_legs() -> AngleSource {
        AngleSource::Bilateral {
            left: JointTriple::new("left_hip", "left_knee", "left_ankle"),
            right: JointTriple::new("right_hip", "right_knee", "right_ankle"),
        }
    }

    #[test]
    fn test_smaller_angle_side_wins() {
        let mut keypoints = leg("left", 120.0, 0.9);
        keypoints.extend(leg("right", 80.0, 0.9));
        let pose = Pose::new(keypoints);

        let m = measure_pose(&pose, &bilateral_legs(), MIN_SCORE).unwrap();
        assert_eq!(m.side, Some(BodySide::Right));
        assert!((m.angle - 80.0).abs() < 0.5);
    }

    #[test]
    fn test_tie_goes_left() {
        let mut keypoints = leg("left", 100.0, 0.9);
        keypoints.extend(leg("right", 100.0, 0.9));
        let pose = Pose::new(keypoints);

        let m = measure_pose(&pose, &bilateral_legs(), MIN_SCORE).unwrap();
        assert_eq!(m.side, Some(BodySide::Left));
    }

    #[test]
    fn test_single_available_side_is_used() {
        // right triple incomplete: ankle below confidence threshold
        let mut keypoints = leg("left", 150.0, 0.9);
        let mut right = leg("right", 60.0, 0.9);
        right[2].score = 0.1;
        keypoints.extend(right);
        let pose = Pose::new(keypoints);

        let m = measure_pose(&pose, &bilateral_legs(), MIN_SCORE).unwrap();
        assert_eq!(m.side, Some(BodySide::Left));
        assert!((m.angle - 150.0).abs() < 0.5);
    }

    #[test]
    fn test_no_usable_side_yields_nothing() {
        let pose = Pose::new(leg("left", 120.0, 0.2));
        assert!(measure_pose(&pose, &bilateral_legs(), MIN_SCORE).is_none());
    }

    #[test]
    fn test_averaged_source_means_available_triples() {
        // Shoulder-hip-hip triples forming 90 and 0 degree angles
        let pose = Pose::new(vec![
            Keypoint::new("left_shoulder", 0.4, 0.2, 0.9),
            Keypoint::new("right_shoulder", 0.6, 0.2, 0.9),
            Keypoint::new("left_hip", 0.4, 0.6, 0.9),
            Keypoint::new("right_hip", 0.6, 0.6, 0.9),
        ]);
        let source = AngleSource::Averaged {
            triples: &SHOULDER_HIP_TRIPLES,
        };

        let m = measure_pose(&pose, &source, MIN_SCORE).unwrap();
        assert_eq!(m.side, None);
        // both triples form right angles here
        assert!((m.angle - 90.0).abs() < 0.5);
    }

    #[test]
    fn test_averaged_source_with_one_missing_triple() {
        let pose = Pose::new(vec![
            Keypoint::new("left_shoulder", 0.4, 0.2, 0.9),
            Keypoint::new("left_hip", 0.4, 0.6, 0.9),
            Keypoint::new("right_hip", 0.6, 0.6, 0.9),
        ]);
        let source = AngleSource::Averaged {
            triples: &SHOULDER_HIP_TRIPLES,
        };

        // only the left triple is computable; its angle stands alone
        let m = measure_pose(&pose, &source, MIN_SCORE).unwrap();
        assert!((m.angle - 90.0).abs() < 0.5);
    }
}
