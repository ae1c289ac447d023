use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::{clean_price, DIRECTION_TOKEN};
use crate::table::Table;

static TRIPLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"({DIRECTION_TOKEN})\s*[/|]\s*([0-9,.]+)\s*[/|]\s*([0-9,.]+)\s*[/|]\s*([0-9,.]+)"
    ))
    .unwrap()
});

/// Slash/pipe triple scan: "多/81000/83259/80000" — a direction token
/// followed by three numeral groups. First match wins.
pub fn parse(text: &str) -> Option<Table> {
    let caps = TRIPLE_RE.captures(text)?;
    Some(Table::signal_row(
        caps[1].to_string(),
        clean_price(&caps[2]),
        clean_price(&caps[3]),
        clean_price(&caps[4]),
    ))
}
