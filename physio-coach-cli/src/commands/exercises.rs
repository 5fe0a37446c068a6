use anyhow::Result;
use clap::Args;
use console::style;

use physio_coach_core::models::exercise::{AngleSource, Exercise, ExerciseProfile};

#[derive(Args)]
pub struct ExercisesCommand {
    /// Show joint and threshold details
    #[arg(short, long)]
    detailed: bool,
}

impl ExercisesCommand {
    pub async fn execute(self) -> Result<()> {
        println!("Supported Exercises");
        println!("────────────────────────────────");

        for exercise in Exercise::ALL {
            let profile = ExerciseProfile::for_exercise(exercise);
            println!(
                "{:<22} {}",
                style(exercise.display_name()).bold(),
                style(exercise.key()).dim()
            );

            if self.detailed {
                match &profile.angles {
                    AngleSource::Bilateral { left, .. } => {
                        println!("    angle:  {} / {} / {} (per side)", left.a, left.b, left.c);
                    }
                    AngleSource::Averaged { triples } => {
                        for triple in triples.iter() {
                            println!("    angle:  {} / {} / {} (averaged)", triple.a, triple.b, triple.c);
                        }
                    }
                }
                if let Some(rule) = profile.reps {
                    println!(
                        "    reps:   arm above {:.0}°, count below {:.0}°",
                        rule.arm_above, rule.count_below
                    );
                } else {
                    println!("    reps:   form feedback only");
                }
            }
        }

        Ok(())
    }
}
