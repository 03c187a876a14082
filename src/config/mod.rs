//! Lifecycle configuration
//!
//! A single [`LifecycleConfig`] is loaded from YAML once and threaded
//! through every component constructor.

pub mod cli;
mod load;
mod schema;
pub mod validate;

pub use cli::{
    parse_args, Cli, Command, CompareArgs, LineageArgs, PromoteArgs, RollbackArgs, RunArgs,
    ValidateRecordArgs,
};
pub use load::{load_config, parse_config};
pub use schema::{
    DriftConfig, LifecycleConfig, LogFormat, LoggingConfig, ModelConfig, PathsConfig,
    RetrainConfig, RollbackConfig, SchedulerConfig, SelectionConfig,
};
pub use validate::{validate_config, ValidationError};
