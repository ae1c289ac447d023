use crate::normalize::clean_price;
use crate::table::Table;

/// Trade bias, normalized from source-language tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Long,
    Short,
    #[default]
    Unknown,
}

impl Direction {
    /// Map a free-text token to a bias. "多"/"多单"/"做多"/"long" and friends
    /// become Long, the 空 family and "short" become Short, anything else is
    /// Unknown.
    pub fn parse(token: &str) -> Direction {
        let t = token.trim().to_lowercase();
        if t.is_empty() {
            return Direction::Unknown;
        }
        if t.contains('空') || t.contains("short") {
            Direction::Short
        } else if t.contains('多') || t.contains("long") {
            Direction::Long
        } else {
            Direction::Unknown
        }
    }

    /// Canonical token persisted to the ledger. Unknown is empty.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
            Direction::Unknown => "",
        }
    }
}

/// One extracted signal, ephemeral per extraction attempt.
///
/// Price fields hold either a single decimal numeral or a "low-high" range,
/// and may be empty when the source did not carry them.
#[derive(Debug, Clone, Default)]
pub struct TradingSignal {
    pub direction: Direction,
    pub open_price: String,
    pub take_profit_price: String,
    pub stop_loss_price: String,
    /// Time label from the source text, if any. Diagnostic; not persisted.
    pub time_label: Option<String>,
    /// Which strategy or candidate source produced this signal.
    pub source_method: String,
    /// Score of the winning candidate. Selection-time only.
    pub confidence_score: i32,
}

impl TradingSignal {
    /// A signal is worth persisting only with a known direction and at least
    /// one price.
    pub fn is_persistable(&self) -> bool {
        self.direction != Direction::Unknown
            && (!self.open_price.is_empty()
                || !self.take_profit_price.is_empty()
                || !self.stop_loss_price.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    Time,
    Direction,
    Open,
    TakeProfit,
    StopLoss,
}

fn classify_header(header: &str) -> Option<Column> {
    let h = header.to_lowercase();
    if h.contains("方向") || h.contains("direction") {
        Some(Column::Direction)
    } else if h.contains("开仓") || h.contains("entry") || h.contains("open") {
        Some(Column::Open)
    } else if h.contains("止盈") || h.contains("take") || h.contains("target") || h == "tp" {
        Some(Column::TakeProfit)
    } else if h.contains("止损") || h.contains("stop") || h == "sl" {
        Some(Column::StopLoss)
    } else if h.contains("时间") || h.contains("time") || h.contains("date") {
        Some(Column::Time)
    } else {
        None
    }
}

/// Lift every table row into a `TradingSignal` via header mapping.
///
/// Rows are padded/truncated to the header arity first, so a short row maps
/// cleanly and a long row cannot shift columns.
pub fn signals_from_table(table: &Table, method: &str, confidence: i32) -> Vec<TradingSignal> {
    let columns: Vec<Option<Column>> =
        table.headers.iter().map(|h| classify_header(h)).collect();

    table
        .rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.iter().map(|c| c.trim().to_string()).collect();
            cells.resize(table.headers.len(), String::new());

            let mut signal = TradingSignal {
                source_method: method.to_string(),
                confidence_score: confidence,
                ..Default::default()
            };
            for (cell, column) in cells.iter().zip(&columns) {
                match column {
                    Some(Column::Direction) => signal.direction = Direction::parse(cell),
                    Some(Column::Open) => signal.open_price = clean_price(cell),
                    Some(Column::TakeProfit) => signal.take_profit_price = clean_price(cell),
                    Some(Column::StopLoss) => signal.stop_loss_price = clean_price(cell),
                    Some(Column::Time) => {
                        if !cell.is_empty() {
                            signal.time_label = Some(cell.clone());
                        }
                    }
                    None => {}
                }
            }
            signal
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_tokens() {
        assert_eq!(Direction::parse("多"), Direction::Long);
        assert_eq!(Direction::parse("做多"), Direction::Long);
        assert_eq!(Direction::parse("空单"), Direction::Short);
        assert_eq!(Direction::parse("Short"), Direction::Short);
        assert_eq!(Direction::parse("LONG"), Direction::Long);
        assert_eq!(Direction::parse(""), Direction::Unknown);
        assert_eq!(Direction::parse("hold"), Direction::Unknown);
    }

    #[test]
    fn chinese_headers_map_to_fields() {
        let table = Table::new(
            vec!["方向".into(), "开仓价".into(), "止盈价".into(), "止损价".into()],
            vec![vec!["空".into(), "80,500-81,300".into(), "78,000".into(), "83,500".into()]],
        );
        let signals = signals_from_table(&table, "vision_table", 10);
        assert_eq!(signals.len(), 1);
        let s = &signals[0];
        assert_eq!(s.direction, Direction::Short);
        assert_eq!(s.open_price, "80500-81300");
        assert_eq!(s.take_profit_price, "78000");
        assert_eq!(s.stop_loss_price, "83500");
        assert!(s.is_persistable());
    }

    #[test]
    fn time_column_becomes_label_not_price() {
        let table = Table::new(
            vec!["时间".into(), "方向".into(), "开仓".into(), "止盈".into(), "止损".into()],
            vec![vec![
                "20250411220".into(),
                "多".into(),
                "81000".into(),
                "83259".into(),
                "80000".into(),
            ]],
        );
        let signals = signals_from_table(&table, "delimited", 0);
        assert_eq!(signals[0].time_label.as_deref(), Some("20250411220"));
        assert_eq!(signals[0].open_price, "81000");
    }

    #[test]
    fn short_rows_are_padded_to_header_arity() {
        let table = Table::new(
            vec!["direction".into(), "open".into(), "take_profit".into(), "stop_loss".into()],
            vec![vec!["long".into(), "81000".into(), "83259".into()]],
        );
        let signals = signals_from_table(&table, "key_value", 0);
        assert_eq!(signals[0].stop_loss_price, "");
        assert!(signals[0].is_persistable());
    }

    #[test]
    fn unknown_direction_is_not_persistable() {
        let table = Table::signal_row("".into(), "81000".into(), "".into(), "".into());
        let signals = signals_from_table(&table, "loose", 0);
        assert!(!signals[0].is_persistable());
    }
}
