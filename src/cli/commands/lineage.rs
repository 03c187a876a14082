//! Lineage command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{LifecycleConfig, LineageArgs};
use crate::lifecycle::{LineageLedger, LineageRecord};

/// One-line summary of a ledger record
pub fn format_record(record: &LineageRecord) -> String {
    let metrics = record
        .metrics
        .iter()
        .map(|(name, value)| format!("{name}={value:.4}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{}  {:<16} {} <- {}  {}",
        record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        record.trigger,
        record.model_version,
        record.parent_model.as_deref().unwrap_or("-"),
        metrics
    )
}

/// The last `n` records, or all of them
pub fn tail(records: &[LineageRecord], n: Option<usize>) -> &[LineageRecord] {
    match n {
        Some(n) => &records[records.len().saturating_sub(n)..],
        None => records,
    }
}

pub fn run_lineage(
    args: LineageArgs,
    config: &LifecycleConfig,
    level: LogLevel,
) -> Result<(), String> {
    let ledger = LineageLedger::new(&config.paths.lineage_file);
    let records = ledger.load().map_err(|e| format!("Failed to read lineage: {e}"))?;
    let shown = tail(&records, args.last);

    if args.json {
        let json = serde_json::to_string_pretty(shown)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    if shown.is_empty() {
        log(level, LogLevel::Normal, "Lineage ledger is empty");
        return Ok(());
    }
    log(level, LogLevel::Verbose, &format!("Ledger: {}", ledger.path().display()));
    for record in shown {
        println!("{}", format_record(record));
    }
    Ok(())
}
