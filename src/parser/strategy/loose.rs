use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::DIRECTION_TOKEN;
use crate::table::Table;

static LOOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"({DIRECTION_TOKEN})[^0-9]*(\d{{4,}})[^0-9]*(\d{{4,}})[^0-9]*(\d{{4,}})"
    ))
    .unwrap()
});

/// Generic direction+numerals scan, the lowest-priority fallback: a direction
/// token followed anywhere later by three 4+ digit numerals, no delimiter
/// assumed.
pub fn parse(text: &str) -> Option<Table> {
    let rows: Vec<Vec<String>> = LOOSE_RE
        .captures_iter(text)
        .map(|caps| {
            vec![
                caps[1].to_string(),
                caps[2].to_string(),
                caps[3].to_string(),
                caps[4].to_string(),
            ]
        })
        .collect();

    if rows.is_empty() {
        return None;
    }
    Some(Table::new(
        crate::table::SIGNAL_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows,
    ))
}
