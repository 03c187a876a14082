//! Run command implementation

use std::time::Duration;

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{LifecycleConfig, RunArgs};
use crate::lifecycle::{LifecycleScheduler, RunStats};

pub fn format_stats(stats: &RunStats) -> String {
    format!(
        "  Ticks: {}\n  Failures: {}\n  Promotions: {}\n  Rollbacks: {}",
        stats.ticks, stats.failures, stats.promotions, stats.rollbacks
    )
}

pub fn run_loop(args: RunArgs, config: &LifecycleConfig, level: LogLevel) -> Result<(), String> {
    let mut scheduler = LifecycleScheduler::from_config(config)
        .map_err(|e| format!("Failed to start scheduler: {e}"))?;
    if let Some(secs) = args.interval {
        scheduler = scheduler.with_interval(Duration::from_secs(secs));
    }

    log(
        level,
        LogLevel::Verbose,
        &format!("Checking every {}s", scheduler.interval().as_secs()),
    );
    let stats = scheduler.run(args.tick_limit());

    log(level, LogLevel::Normal, "Lifecycle run finished:");
    log(level, LogLevel::Normal, &format_stats(&stats));

    if args.once && stats.failures > 0 {
        return Err("Lifecycle check failed".to_string());
    }
    Ok(())
}
