//! Live terminal readout for a running session.

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use physio_coach_core::{ExerciseSession, FrameUpdate, SessionSummary};

/// Progress-bar display of the current set: rep count, joint angle,
/// stage, and form feedback.
pub struct LiveDisplay {
    bar: ProgressBar,
}

impl LiveDisplay {
    pub fn new(session: &ExerciseSession) -> Self {
        Self::with_target(session, ProgressDrawTarget::stderr())
    }

    /// Display that draws nowhere. Used when the output is not a
    /// terminal and in tests.
    pub fn hidden(session: &ExerciseSession) -> Self {
        Self::with_target(session, ProgressDrawTarget::hidden())
    }

    fn with_target(session: &ExerciseSession, target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(session.config().reps_target as u64), target);
        bar.set_style(
            ProgressStyle::with_template("{prefix:12} [{bar:25}] {pos}/{len} reps  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_prefix(format!(
            "{} {}/{}",
            session.config().exercise.display_name(),
            session.state().current_set,
            session.config().total_sets
        ));
        Self { bar }
    }

    /// Reflect one processed frame.
    pub fn frame(&self, update: &FrameUpdate) {
        self.bar.set_position(update.rep_count as u64);
        let side = update
            .side
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();
        self.bar.set_message(format!(
            "{:>5.1}°{side}  {}  {}",
            update.angle,
            style(update.stage.to_string()).cyan(),
            style(update.form_label).green()
        ));
    }

    /// Advance the visible elapsed-time counter.
    pub fn tick(&self, session: &ExerciseSession) {
        let elapsed = session.state().elapsed_seconds;
        self.bar
            .set_prefix(format!(
                "{} {}/{} {:>3}s",
                session.config().exercise.display_name(),
                session.state().current_set,
                session.config().total_sets,
                elapsed
            ));
    }

    pub fn set_break(&self, session: &ExerciseSession) {
        self.bar.println(format!(
            "{} set {} done ({} reps total)",
            style("✓").green(),
            session.state().current_set,
            session.rep().total_reps
        ));
    }

    pub fn next_set(&self, session: &ExerciseSession) {
        self.bar.set_position(0);
        self.bar.set_prefix(format!(
            "{} {}/{}",
            session.config().exercise.display_name(),
            session.state().current_set,
            session.config().total_sets
        ));
    }

    /// Tear down the bar and print the end-of-session block.
    pub fn finish(&self, summary: &SessionSummary) {
        self.bar.finish_and_clear();

        println!();
        println!("{}", style("Session complete").bold());
        println!("────────────────────────────────");
        println!("Exercise:     {}", summary.exercise.display_name());
        println!(
            "Reps:         {}/{} across {} set(s)",
            summary.total_reps, summary.assigned_reps, summary.sets
        );
        println!("Duration:     {}s", summary.duration_seconds);
        if summary.total_reps > 0 {
            println!("Avg per rep:  {:.1}s", summary.avg_seconds_per_rep);
        }
        println!("Form score:   {:.0}%", summary.form_score * 100.0);
    }
}
