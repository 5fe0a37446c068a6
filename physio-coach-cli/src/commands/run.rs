use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;

use physio_coach_core::models::exercise::{Exercise, UnknownExercise};
use physio_coach_core::{ExerciseSession, SessionConfig};

use crate::api::{ApiClient, ReportRequest};
use crate::camera::DirectoryFrameSource;
use crate::config::Config;
use crate::runner::{run_session, RunnerConfig, SetBreakPolicy};
use crate::ui::LiveDisplay;

fn parse_exercise(s: &str) -> Result<Exercise, UnknownExercise> {
    s.parse()
}

#[derive(Args)]
pub struct RunCommand {
    /// Exercise to track (see `physio-coach exercises`)
    #[arg(value_parser = parse_exercise)]
    exercise: Exercise,

    /// Target repetitions per set
    #[arg(short, long, default_value = "10")]
    reps: u32,

    /// Number of sets
    #[arg(short, long, default_value = "3")]
    sets: u32,

    /// Directory of frame images to replay
    #[arg(long)]
    frames_dir: PathBuf,

    /// Rest between sets, in seconds
    #[arg(long, default_value = "5")]
    rest: u64,

    /// Stop after the first completed set
    #[arg(long)]
    stop_after_set: bool,

    /// Skip report generation
    #[arg(long)]
    no_report: bool,

    /// Patient name for the report (overrides config)
    #[arg(long)]
    patient_name: Option<String>,

    /// Patient identifier for the report (overrides config)
    #[arg(long)]
    patient_id: Option<String>,
}

impl RunCommand {
    pub async fn execute(self) -> Result<()> {
        let config = Config::load()?;
        let client = ApiClient::new(&config)?;

        let session_config = SessionConfig::new(self.exercise, self.reps, self.sets)
            .with_min_keypoint_score(config.capture.min_keypoint_score);
        let session = ExerciseSession::new(session_config);

        let source = DirectoryFrameSource::new(&self.frames_dir).await?;
        let display = LiveDisplay::new(&session);

        let runner_config = RunnerConfig {
            tick_interval_ms: config.capture.tick_interval_ms,
            sample_interval_ms: config.capture.sample_interval_ms,
            set_break: if self.stop_after_set {
                SetBreakPolicy::EndSession
            } else {
                SetBreakPolicy::AutoContinue {
                    rest_seconds: self.rest,
                }
            },
        };

        let session = run_session(session, source, client.clone(), runner_config, &display).await?;

        let summary = session.summary();
        display.finish(&summary);

        if self.no_report {
            return Ok(());
        }

        let patient_name = self.patient_name.unwrap_or(config.patient.name);
        let patient_id = self.patient_id.unwrap_or(config.patient.id);
        let report = ReportRequest::from_summary(&summary, &patient_name, &patient_id);

        match client.generate_report(&report).await {
            Ok(response) => {
                println!();
                println!("Report: {}", response.url);
            }
            Err(e) => {
                println!();
                println!(
                    "{} Report generation failed: {:#}",
                    style("✗").red(),
                    e
                );
                println!("Session data shown above is still valid.");
            }
        }

        Ok(())
    }
}
