//! CLI command implementations

mod compare;
mod evaluate;
mod lineage;
mod predictions;
mod promote;
mod rollback;
mod run;
mod status;
mod validate_record;

#[cfg(test)]
mod tests;

use std::path::Path;

use crate::cli::{init_tracing, LogLevel};
use crate::config::{load_config, parse_config, Cli, Command, LifecycleConfig};

/// Load the config named on the command line, or the defaults
fn resolve_config(path: Option<&Path>) -> Result<LifecycleConfig, String> {
    match path {
        Some(path) => load_config(path).map_err(|e| format!("Config error: {e}")),
        None => parse_config("").map_err(|e| format!("Config error: {e}")),
    }
}

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.quiet, cli.verbose);
    let config = resolve_config(cli.config.as_deref())?;
    init_tracing(log_level, &config.logging);

    match cli.command {
        Command::Evaluate => evaluate::run_evaluate(&config, log_level),
        Command::Predictions => predictions::run_predictions(&config, log_level),
        Command::Compare(args) => compare::run_compare(args, &config, log_level),
        Command::Promote(args) => promote::run_promote(args, &config, log_level),
        Command::Rollback(args) => rollback::run_rollback(args, &config, log_level),
        Command::Lineage(args) => lineage::run_lineage(args, &config, log_level),
        Command::Status => status::run_status(&config, log_level),
        Command::ValidateRecord(args) => {
            validate_record::run_validate_record(args, &config, log_level)
        }
        Command::Run(args) => run::run_loop(args, &config, log_level),
    }
}
