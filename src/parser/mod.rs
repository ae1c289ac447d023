pub mod strategy;

use tracing::debug;

use crate::table::Table;

type Strategy = fn(&str) -> Option<Table>;

/// Primary cascade, tried against a raw chat answer.
const PRIMARY: &[(&str, Strategy)] = &[
    ("delimited", strategy::delimited::parse as Strategy),
    ("key_value", strategy::key_value::parse as Strategy),
    ("slash_triple", strategy::slash_triple::parse as Strategy),
    ("proximity", strategy::proximity::parse as Strategy),
];

/// Secondary pattern cascade, tried when the primary finds nothing.
const PATTERNS: &[(&str, Strategy)] = &[
    ("markdown", strategy::markdown::parse as Strategy),
    ("timestamped", strategy::timestamped::parse as Strategy),
    ("loose", strategy::loose::parse as Strategy),
];

fn first_usable(text: &str, strategies: &[(&'static str, Strategy)]) -> Option<(&'static str, Table)> {
    for &(name, parse) in strategies {
        if let Some(table) = parse(text) {
            if table.is_usable() {
                debug!(strategy = name, rows = table.rows.len(), "strategy matched");
                return Some((name, table));
            }
        }
    }
    None
}

/// Run the primary strategies (delimited, key/value, slash-triple,
/// keyword-proximity) in order; first structural success wins.
pub fn extract_from_text(text: &str) -> Option<(&'static str, Table)> {
    first_usable(text, PRIMARY)
}

/// Run the pattern strategies (markdown table, timestamp+direction, loose
/// direction+numerals) in order.
pub fn parse_with_patterns(text: &str) -> Option<(&'static str, Table)> {
    first_usable(text, PATTERNS)
}

/// Full cascade: primary strategies, then pattern strategies. Exhausting
/// both is an expected miss, not an error.
pub fn run_cascade(text: &str) -> Option<(&'static str, Table)> {
    extract_from_text(text).or_else(|| parse_with_patterns(text))
}
