use serde::Deserialize;

/// Canonical 4-column header used by strategies that synthesize a table.
pub const SIGNAL_HEADERS: [&str; 4] = ["direction", "open", "take_profit", "stop_loss"];

/// 5-column variant carrying a leading source time label.
pub const TIMED_SIGNAL_HEADERS: [&str; 5] = ["time", "direction", "open", "take_profit", "stop_loss"];

/// A table lifted out of a chat answer: header cells plus verbatim data rows.
///
/// Cells are carried exactly as extracted; direction and price normalization
/// happens only when a row is lifted into a `TradingSignal`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table { headers, rows }
    }

    /// Single-row table with the canonical 4-column header.
    pub fn signal_row(direction: String, open: String, take_profit: String, stop_loss: String) -> Self {
        Table {
            headers: SIGNAL_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: vec![vec![direction, open, take_profit, stop_loss]],
        }
    }

    /// Structural validity: non-empty headers and at least one row of 3+ cells.
    /// This is what the cascade driver accepts as a result.
    pub fn is_usable(&self) -> bool {
        !self.headers.is_empty() && self.rows.iter().any(|r| r.len() >= 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usable_requires_headers_and_a_wide_row() {
        let empty = Table::new(vec![], vec![vec!["a".into(), "b".into(), "c".into()]]);
        assert!(!empty.is_usable());

        let narrow = Table::new(
            vec!["direction".into(), "open".into()],
            vec![vec!["long".into(), "81000".into()]],
        );
        assert!(!narrow.is_usable());

        let ok = Table::signal_row("long".into(), "81000".into(), "83259".into(), "80000".into());
        assert!(ok.is_usable());
    }
}
