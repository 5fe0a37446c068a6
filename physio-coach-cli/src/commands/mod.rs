mod config_cmd;
mod exercises;
mod run;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use exercises::ExercisesCommand;
pub use run::RunCommand;

#[derive(Parser)]
#[command(name = "physio-coach")]
#[command(about = "Physiotherapy exercise tracking from camera frames", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a live exercise session
    Run(RunCommand),

    /// List the supported exercises
    Exercises(ExercisesCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::info!("Verbose mode enabled");
        }

        match self.command {
            Commands::Run(cmd) => cmd.execute().await,
            Commands::Exercises(cmd) => cmd.execute().await,
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config().await,
                ConfigSubcommands::Init { force } => config_cmd::init_config(force).await,
            },
        }
    }
}
