//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Relevo: unattended model-lifecycle control loop
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "relevo")]
#[command(version)]
#[command(
    about = "Drift monitoring, champion/challenger promotion, lineage and rollback for a production model"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to YAML configuration (defaults apply when omitted)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Compute drift and write the health report
    Evaluate,

    /// Summarize logged prediction probabilities
    Predictions,

    /// Compare a candidate against the production model
    Compare(CompareArgs),

    /// Promote an experiment version into the production slot
    Promote(PromoteArgs),

    /// Restore the previously promoted version
    Rollback(RollbackArgs),

    /// Print the lineage ledger
    Lineage(LineageArgs),

    /// Show the production slot and latest reports
    Status,

    /// Validate a JSON request record against the production feature contract
    ValidateRecord(ValidateRecordArgs),

    /// Run the lifecycle loop
    Run(RunArgs),
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct CompareArgs {
    /// Candidate version (defaults to the latest experiment)
    #[arg(value_name = "VERSION")]
    pub version: Option<String>,
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PromoteArgs {
    /// Experiment directory name to promote
    #[arg(value_name = "VERSION")]
    pub version: String,

    /// Promote even if the candidate does not beat the incumbent
    #[arg(long)]
    pub skip_compare: bool,
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct RollbackArgs {
    /// Roll back without consulting the configured trigger
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct LineageArgs {
    /// Print the raw JSON ledger
    #[arg(long)]
    pub json: bool,

    /// Show only the last N records
    #[arg(short = 'n', long)]
    pub last: Option<usize>,
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateRecordArgs {
    /// JSON file holding one request record
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct RunArgs {
    /// Run a single tick and exit
    #[arg(long, conflicts_with = "max_ticks")]
    pub once: bool,

    /// Stop after N ticks
    #[arg(long, value_name = "N")]
    pub max_ticks: Option<u64>,

    /// Override the configured interval
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,
}

impl RunArgs {
    /// Tick limit implied by the flags; `None` runs forever
    pub fn tick_limit(&self) -> Option<u64> {
        if self.once {
            Some(1)
        } else {
            self.max_ticks
        }
    }
}

/// Parse command line arguments
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
