use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::client::{DeepSeekClient, ModelReply};
use crate::ledger;
use crate::parser;
use crate::score::{select_best, Candidate, CandidateData};
use crate::signal::{signals_from_table, Direction, TradingSignal};
use crate::table::Table;

/// One extraction cycle for a screenshot: gather candidates from the vision
/// model, pick the best, cascade-parse, dedup-append. Returns true when a
/// usable table was extracted and handed to the ledger (a duplicate skip
/// still counts as success); false is an extraction miss, not an error.
pub async fn process_image_file(
    client: &DeepSeekClient,
    image_path: &Path,
    ledger_path: &Path,
    auto_only: bool,
) -> Result<bool> {
    let image = std::fs::read(image_path)
        .with_context(|| format!("reading image {}", image_path.display()))?;

    let mut candidates = Vec::new();
    match client.extract_table_from_image(&image).await {
        ModelReply::Table(table) => {
            candidates.push(Candidate::new(CandidateData::Table(table), "vision_table"));
        }
        ModelReply::Text(text) => {
            candidates.push(Candidate::new(CandidateData::Text(text), "vision_text"));
        }
        ModelReply::Failed { error, .. } => {
            warn!(image = %image_path.display(), %error, "vision extraction yielded no candidate");
        }
    }

    if let Some(winner) = select_best(candidates) {
        info!(method = %winner.method, score = winner.score, "best candidate selected");
        if handle_candidate(&winner, ledger_path)? {
            return Ok(true);
        }
    }

    if auto_only {
        info!(image = %image_path.display(), "automatic extraction failed");
        return Ok(false);
    }
    manual_fallback(ledger_path)
}

/// One extraction cycle for a text answer: local cascade first, then the
/// reformatting model as a fallback when a client key is available.
pub async fn process_text(
    client: &DeepSeekClient,
    text: &str,
    ledger_path: &Path,
    auto_only: bool,
    allow_model: bool,
) -> Result<bool> {
    if let Some((method, table)) = parser::run_cascade(text) {
        return persist_table(&table, method, 0, ledger_path).map(|_| true);
    }

    if allow_model && client.has_key() {
        match client.reformat_table_text(text).await {
            ModelReply::Table(table) => {
                return persist_table(&table, "model_reformat", 0, ledger_path).map(|_| true);
            }
            ModelReply::Text(reformatted) => {
                if let Some((method, table)) = parser::run_cascade(&reformatted) {
                    return persist_table(&table, method, 0, ledger_path).map(|_| true);
                }
            }
            ModelReply::Failed { error, .. } => {
                warn!(%error, "text reformatting yielded no candidate");
            }
        }

        // Last model-backed resort: have the chat model rewrite the answer
        // as bare table lines, then cascade over those.
        if let Some(formatted) = client.format_strategy(text, None).await {
            if let Some((method, table)) = parser::run_cascade(&formatted) {
                return persist_table(&table, method, 0, ledger_path).map(|_| true);
            }
        }
    }

    if auto_only {
        return Ok(false);
    }
    manual_fallback(ledger_path)
}

/// Route the winning candidate: a table goes straight to the ledger, text
/// goes through the cascade first. False means the cascade missed.
fn handle_candidate(winner: &Candidate, ledger_path: &Path) -> Result<bool> {
    match &winner.data {
        CandidateData::Table(table) => {
            persist_table(table, &winner.method, winner.score, ledger_path)?;
            Ok(true)
        }
        CandidateData::Text(text) => match parser::run_cascade(text) {
            Some((method, table)) => {
                persist_table(&table, method, winner.score, ledger_path)?;
                Ok(true)
            }
            None => {
                info!("cascade exhausted without a table");
                Ok(false)
            }
        },
    }
}

fn persist_table(table: &Table, method: &str, confidence: i32, ledger_path: &Path) -> Result<usize> {
    print_table(table);
    let signals = signals_from_table(table, method, confidence);
    let written = ledger::append_signals(&signals, ledger_path)?;
    info!(method, rows = signals.len(), written, "table persisted");
    Ok(written)
}

fn print_table(table: &Table) {
    println!("{}", table.headers.join(" | "));
    println!("{}", "-".repeat(50));
    for row in &table.rows {
        println!("{}", row.join(" | "));
    }
}

/// Prompt for direction/entry/target/stop on stdin; append whatever was
/// entered, subject to the same dedup check.
fn manual_fallback(ledger_path: &Path) -> Result<bool> {
    println!("\nAutomatic extraction failed. Enter the signal manually (blank to skip):");
    let direction = prompt("direction (多/空 or long/short): ")?;
    let open = prompt("open price: ")?;
    let take_profit = prompt("take-profit price: ")?;
    let stop_loss = prompt("stop-loss price: ")?;

    if direction.is_empty() && open.is_empty() && take_profit.is_empty() && stop_loss.is_empty() {
        println!("Nothing entered, skipping.");
        return Ok(false);
    }

    let signal = TradingSignal {
        direction: Direction::parse(&direction),
        open_price: crate::normalize::clean_price(&open),
        take_profit_price: crate::normalize::clean_price(&take_profit),
        stop_loss_price: crate::normalize::clean_price(&stop_loss),
        source_method: "manual".to_string(),
        ..Default::default()
    };
    if !signal.is_persistable() {
        println!("Manual input lacks a direction or any price, not saved.");
        return Ok(false);
    }

    let written = ledger::append_signals(&[signal], ledger_path)?;
    if written > 0 {
        println!("Manual signal saved to {}", ledger_path.display());
    } else {
        println!("Manual signal matched the latest ledger row, not saved.");
    }
    Ok(true)
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
