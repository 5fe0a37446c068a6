//! Joint-angle geometry.

use crate::models::keypoint::Keypoint;

/// Unsigned angle at vertex `b` between rays `b -> a` and `b -> c`,
/// in degrees, range [0, 180].
///
/// Computed as the absolute difference of the two rays' polar angles,
/// reflected into [0, 180]. Symmetric in the outer arguments:
/// `angle_at(a, b, c) == angle_at(c, b, a)`.
pub fn angle_at(a: &Keypoint, b: &Keypoint, c: &Keypoint) -> f32 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut degrees = radians.to_degrees().abs();
    if degrees > 180.0 {
        degrees = 360.0 - degrees;
    }
    degrees
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kp(x: f32, y: f32) -> Keypoint {
        Keypoint::new("test", x, y, 1.0)
    }

    #[test]
    fn test_right_angle() {
        let angle = angle_at(&kp(0.0, 0.0), &kp(0.0, 1.0), &kp(1.0, 1.0));
        assert!((angle - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_straight_line_is_180() {
        let angle = angle_at(&kp(0.0, 0.5), &kp(0.5, 0.5), &kp(1.0, 0.5));
        assert!((angle - 180.0).abs() < 0.01);
    }

    #[test]
    fn test_folded_back_is_0() {
        let angle = angle_at(&kp(1.0, 0.5), &kp(0.5, 0.5), &kp(1.0, 0.5));
        assert!(angle.abs() < 0.01);
    }

    #[test]
    fn test_45_degrees() {
        let angle = angle_at(&kp(1.0, 0.0), &kp(0.0, 0.0), &kp(1.0, 1.0));
        assert!((angle - 45.0).abs() < 0.01);
    }

    proptest! {
        #[test]
        fn prop_angle_in_range(
            ax in -1.0f32..2.0, ay in -1.0f32..2.0,
            bx in -1.0f32..2.0, by in -1.0f32..2.0,
            cx in -1.0f32..2.0, cy in -1.0f32..2.0,
        ) {
            let angle = angle_at(&kp(ax, ay), &kp(bx, by), &kp(cx, cy));
            prop_assert!((0.0..=180.0).contains(&angle));
        }

        #[test]
        fn prop_angle_endpoint_symmetry(
            ax in -1.0f32..2.0, ay in -1.0f32..2.0,
            bx in -1.0f32..2.0, by in -1.0f32..2.0,
            cx in -1.0f32..2.0, cy in -1.0f32..2.0,
        ) {
            let forward = angle_at(&kp(ax, ay), &kp(bx, by), &kp(cx, cy));
            let reverse = angle_at(&kp(cx, cy), &kp(bx, by), &kp(ax, ay));
            prop_assert!((forward - reverse).abs() < 1e-3);
        }
    }
}
