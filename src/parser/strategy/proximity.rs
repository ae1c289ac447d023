use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::{clean_price, contains_any, PRICE_TERMS};
use crate::table::Table;

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4,6}[,.]?\d{0,3})").unwrap());
static OPEN_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:开仓|entry)[^:：]*[:：]\s*([0-9,.\-]+)").unwrap());
static TAKE_PROFIT_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:止盈|target)[^:：]*[:：]\s*([0-9,.\-]+)").unwrap());
static STOP_LOSS_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:止损|stop)[^:：]*[:：]\s*([0-9,.\-]+)").unwrap());

/// Keyword-proximity scan: a line mentioning a direction and at least one of
/// the entry/target/stop terms. Prices are the 4-6 digit numerals on the
/// line, positionally open/take-profit/stop-loss; explicit labels on the same
/// line override the positional guess.
pub fn parse(text: &str) -> Option<Table> {
    for line in text.lines() {
        let lower = line.to_lowercase();
        let has_direction = line.contains('多')
            || line.contains('空')
            || lower.contains("long")
            || lower.contains("short")
            || line.contains("方向");
        if !has_direction || !contains_any(line, PRICE_TERMS) {
            continue;
        }

        let direction = if line.contains('多') {
            "多"
        } else if line.contains('空') {
            "空"
        } else if lower.contains("short") {
            "short"
        } else if lower.contains("long") {
            "long"
        } else {
            continue;
        };

        let prices: Vec<String> = PRICE_RE
            .find_iter(line)
            .map(|m| clean_price(m.as_str()))
            .collect();
        if prices.is_empty() {
            continue;
        }

        let mut open = prices.first().cloned().unwrap_or_default();
        let mut take_profit = prices.get(1).cloned().unwrap_or_default();
        let mut stop_loss = prices.get(2).cloned().unwrap_or_default();

        // Explicit labels on the line beat positional order.
        let fully_labeled = (line.contains("开仓") || lower.contains("entry"))
            && (line.contains("止盈") || lower.contains("target"))
            && (line.contains("止损") || lower.contains("stop"));
        if fully_labeled {
            if let Some(caps) = OPEN_LABEL_RE.captures(line) {
                open = clean_price(&caps[1]);
            }
            if let Some(caps) = TAKE_PROFIT_LABEL_RE.captures(line) {
                take_profit = clean_price(&caps[1]);
            }
            if let Some(caps) = STOP_LOSS_LABEL_RE.captures(line) {
                stop_loss = clean_price(&caps[1]);
            }
        }

        return Some(Table::signal_row(
            direction.to_string(),
            open,
            take_profit,
            stop_loss,
        ));
    }
    None
}
