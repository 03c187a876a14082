//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! relevo --config relevo.yaml evaluate
//! relevo compare churn_model_v4
//! relevo promote churn_model_v4
//! relevo rollback --force
//! relevo run --once
//! ```

mod core;


pub use core::{
    parse_args, Cli, Command, CompareArgs, LineageArgs, PromoteArgs, RollbackArgs, RunArgs,
    ValidateRecordArgs,
};
