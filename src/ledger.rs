use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, info};

use crate::dedup;
use crate::signal::TradingSignal;

/// Fixed column schema, stable across the file's lifetime.
pub const HEADER: [&str; 5] = [
    "recorded_time",
    "direction",
    "open_price",
    "take_profit_price",
    "stop_loss_price",
];

const TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One persisted row. Created on a successful dedup check, appended once,
/// never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRecord {
    pub recorded_time: String,
    pub direction: String,
    pub open_price: String,
    pub take_profit_price: String,
    pub stop_loss_price: String,
}

impl LedgerRecord {
    /// Build a record from a signal, stamping the capture time now. The
    /// signal's own time label is diagnostic and not persisted.
    pub fn from_signal(signal: &TradingSignal) -> Self {
        LedgerRecord {
            recorded_time: Local::now().format(TIME_FORMAT).to_string(),
            direction: signal.direction.as_str().to_string(),
            open_price: signal.open_price.clone(),
            take_profit_price: signal.take_profit_price.clone(),
            stop_loss_price: signal.stop_loss_price.clone(),
        }
    }
}

/// Read only the most recent record; the full history is never loaded.
pub fn last_record(path: &Path) -> Result<Option<LedgerRecord>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("reading ledger {}", path.display()))?;

    let mut last = None;
    for row in reader.records() {
        let row = row?;
        if row.len() >= 5 {
            last = Some(LedgerRecord {
                recorded_time: row[0].to_string(),
                direction: row[1].to_string(),
                open_price: row[2].to_string(),
                take_profit_price: row[3].to_string(),
                stop_loss_price: row[4].to_string(),
            });
        }
    }
    Ok(last)
}

/// Append one record, creating the file (and writing the header exactly
/// once) if needed. Returns false when the record is a near-duplicate of the
/// most recent row; a rejected record has no side effect.
pub fn append(record: &LedgerRecord, path: &Path) -> Result<bool> {
    let window: Vec<LedgerRecord> = last_record(path)?.into_iter().collect();
    if dedup::is_duplicate(record, &window) {
        info!(
            direction = %record.direction,
            open = %record.open_price,
            "duplicate of the latest ledger row, skipping"
        );
        return Ok(false);
    }

    let new_file = !path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening ledger {}", path.display()))?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    if new_file {
        writer.write_record(HEADER)?;
    }
    writer.write_record([
        record.recorded_time.as_str(),
        record.direction.as_str(),
        record.open_price.as_str(),
        record.take_profit_price.as_str(),
        record.stop_loss_price.as_str(),
    ])?;
    writer.flush()?;
    Ok(true)
}

/// Append every persistable signal; returns how many rows were written.
/// Non-persistable signals are skipped, duplicates are counted out.
pub fn append_signals(signals: &[TradingSignal], path: &Path) -> Result<usize> {
    let mut written = 0;
    for signal in signals {
        if !signal.is_persistable() {
            debug!(method = %signal.source_method, "signal lacks direction or prices, skipping");
            continue;
        }
        let record = LedgerRecord::from_signal(signal);
        if append(&record, path)? {
            written += 1;
        }
    }
    Ok(written)
}
