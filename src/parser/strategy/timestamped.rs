use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::DIRECTION_TOKEN;
use crate::table::Table;

static DATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(\d{{8}}|\d{{6}})(\d{{4}}|\d{{2}}:\d{{2}})?\s*[|/]\s*({DIRECTION_TOKEN})\s*[|/]\s*(\d+)"
    ))
    .unwrap()
});
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{5,}").unwrap());

/// Timestamp + direction scan: a 6/8 digit date (optionally with a time)
/// next to a direction token and a numeral. The 5+ digit numerals following
/// the direction are taken as entry/target/stop in order. Produces a
/// 5-column table with a leading time column.
pub fn parse(text: &str) -> Option<Table> {
    let mut rows = Vec::new();

    for caps in DATED_RE.captures_iter(text) {
        let time_label = format!(
            "{}{}",
            &caps[1],
            caps.get(2).map(|m| m.as_str()).unwrap_or("")
        );
        let direction = caps[3].to_string();

        // Look at the 200 chars after the direction token for prices.
        let window: String = text[caps.get(3).unwrap().end()..].chars().take(200).collect();
        let mut prices: Vec<String> = PRICE_RE
            .find_iter(&window)
            .take(3)
            .map(|m| m.as_str().to_string())
            .collect();
        prices.resize(3, String::new());

        let mut row = vec![time_label, direction];
        row.extend(prices);
        rows.push(row);
    }

    if rows.is_empty() {
        return None;
    }
    Some(Table::new(
        crate::table::TIMED_SIGNAL_HEADERS
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows,
    ))
}
