//! Logging utilities for CLI output

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Environment variable that overrides every other filter source
pub const LOG_ENV: &str = "RELEVO_LOG";

/// Log level for CLI output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Suppress all output
    Quiet,
    /// Normal output level
    Normal,
    /// Verbose output with additional details
    Verbose,
}

impl LogLevel {
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            LogLevel::Quiet
        } else if verbose {
            LogLevel::Verbose
        } else {
            LogLevel::Normal
        }
    }

    /// Default tracing directive for this level
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Quiet => "relevo=error",
            LogLevel::Normal => "relevo=info",
            LogLevel::Verbose => "relevo=debug",
        }
    }
}

/// Log a message if the current level permits it
pub fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}

/// Filter precedence: `RELEVO_LOG`, then the config's `logging.filter`,
/// then the CLI level
fn build_filter(level: LogLevel, config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    config
        .filter
        .as_deref()
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new(level.directive()))
}

/// Install the global tracing subscriber
///
/// Diagnostics go to stderr so command output on stdout stays parseable.
/// Calling this twice is harmless; the second install is ignored.
pub fn init_tracing(level: LogLevel, config: &LoggingConfig) {
    let filter = build_filter(level, config);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
