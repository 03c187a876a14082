//! Relevo CLI
//!
//! Operator entry point for the model-lifecycle loop.
//!
//! # Usage
//!
//! ```bash
//! # Score drift and write the health report
//! relevo --config relevo.yaml evaluate
//!
//! # Champion/challenger check against production
//! relevo compare churn_model_v4
//!
//! # Promote by hand
//! relevo promote churn_model_v4
//!
//! # Revert to the previous model
//! relevo rollback --force
//!
//! # Run the loop
//! relevo run --interval 600
//! ```

use clap::Parser;
use relevo::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
