use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "firmcheck",
    version,
    about = "Heuristic checks and simulated verification for Arduino projects"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the check battery and health score over a project file
    Check {
        /// Path to the project JSON file
        project: PathBuf,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Optional git commit hash for tool metadata
        #[arg(long)]
        commit: Option<String>,
    },
    /// Run the timed verification sequence, streaming its log
    Verify {
        project: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Run the virtual board for a number of ticks
    Simulate {
        project: PathBuf,

        /// Ticks to run before halting
        #[arg(long, default_value_t = 10)]
        ticks: u32,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Print fix requests for failing checks and low health
    FixPrompt {
        project: PathBuf,

        /// Only the prompt for this check id (e.g. R-PIN-01)
        #[arg(long)]
        check: Option<String>,
    },
    /// Print a built-in example project as JSON
    Example {
        /// blink, traffic-light or lcd-temperature
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct EngineArgs {
    /// Seed for step delays and pin flips
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON file overriding engine timing
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
