//! Angle-to-form-label classification.

use crate::models::exercise::FormRule;

/// Label used when an angle carries no corrective feedback.
pub const NEUTRAL_LABEL: &str = "Good";

/// Map one angle to a feedback label under an exercise's form rule.
///
/// Pure function of its inputs: the label reacts to every frame and
/// never sticks, so a single borderline sample can flip it and the
/// next sample flips it back.
pub fn classify_form(rule: &FormRule, angle: f32) -> &'static str {
    match *rule {
        FormRule::Bands {
            low,
            low_label,
            high,
            high_label,
            mid_label,
        } => {
            if angle < low {
                low_label
            } else if angle > high {
                high_label
            } else {
                mid_label
            }
        }
        FormRule::AboveIsGood {
            threshold,
            good,
            hint,
        } => {
            if angle > threshold {
                good
            } else {
                hint
            }
        }
        FormRule::WithinRange {
            min,
            max,
            good,
            hint,
        } => {
            if angle > min && angle < max {
                good
            } else {
                hint
            }
        }
        FormRule::Generic => {
            if angle > 170.0 || angle < 30.0 {
                "Check form"
            } else {
                NEUTRAL_LABEL
            }
        }
    }
}
