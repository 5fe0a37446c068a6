//! Debounced repetition-counting state machine.

use crate::models::exercise::RepRule;
use crate::models::session::RepState;

/// What one observed angle did to the repetition machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepSignal {
    /// No repetition boundary was crossed.
    None,
    /// A repetition completed and passed the debounce check.
    Counted,
    /// A repetition boundary was crossed too soon after the previous
    /// honored one; the stage still advanced, the rep was dropped.
    Debounced,
}

/// Applies one exercise's [`RepRule`] to successive angle samples.
///
/// The transition is a total function of (stage, angle): crossing
/// `arm_above` arms the machine, and dropping below `count_below`
/// while armed fires a repetition. The counter itself is stateless;
/// stage and debounce bookkeeping live in the caller's [`RepState`].
#[derive(Debug, Clone, Copy)]
pub struct RepCounter {
    rule: RepRule,
    debounce_ms: u64,
}

impl RepCounter {
    pub fn new(rule: RepRule, debounce_ms: u64) -> Self {
        Self { rule, debounce_ms }
    }

    /// Advance the stage machine with one angle sample.
    ///
    /// `now_ms` is the engine clock used for the debounce check; two
    /// honored repetitions are never less than `debounce_ms` apart on
    /// that clock, no matter how fast raw transitions occur.
    pub fn observe(&self, state: &mut RepState, angle: f32, now_ms: u64) -> RepSignal {
        let was_armed = state.stage == self.rule.arm_stage;

        if angle > self.rule.arm_above {
            state.stage = self.rule.arm_stage;
        }

        if was_armed && angle < self.rule.count_below {
            state.stage = self.rule.count_stage;

            let honored = state
                .last_rep_ms
                .map_or(true, |last| now_ms.saturating_sub(last) >= self.debounce_ms);
            if honored {
                state.last_rep_ms = Some(now_ms);
                tracing::debug!(angle, now_ms, "repetition counted");
                return RepSignal::Counted;
            }
            tracing::debug!(angle, now_ms, "repetition dropped by debounce");
            return RepSignal::Debounced;
        }

        RepSignal::None
    }
}
