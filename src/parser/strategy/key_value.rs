use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::{clean_price, DIRECTION_TOKEN};
use crate::table::Table;

static DIRECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?:方向|direction)\s*[：:]\s*({DIRECTION_TOKEN})")).unwrap()
});
static OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:开仓(?:价|价格)?|entry)\s*[：:]\s*([0-9][0-9,.\-]*)").unwrap());
static TAKE_PROFIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:止盈(?:价|价格)?|target|take[ _-]?profit)\s*[：:]\s*([0-9][0-9,.\-]*)").unwrap());
static STOP_LOSS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:止损(?:价|价格)?|stop(?:[ _-]?loss)?)\s*[：:]\s*([0-9][0-9,.\-]*)").unwrap());

/// Key/value scan: `方向: 多, 开仓价: 81000, ...` style fragments, each field
/// matched independently anywhere in the text (ASCII or full-width colon).
/// One found field is enough; the rest become empty strings.
pub fn parse(text: &str) -> Option<Table> {
    let direction = DIRECTION_RE.captures(text).map(|c| c[1].to_string());
    let open = OPEN_RE.captures(text).map(|c| clean_price(&c[1]));
    let take_profit = TAKE_PROFIT_RE.captures(text).map(|c| clean_price(&c[1]));
    let stop_loss = STOP_LOSS_RE.captures(text).map(|c| clean_price(&c[1]));

    if direction.is_none() && open.is_none() && take_profit.is_none() && stop_loss.is_none() {
        return None;
    }

    Some(Table::signal_row(
        direction.unwrap_or_default(),
        open.unwrap_or_default(),
        take_profit.unwrap_or_default(),
        stop_loss.unwrap_or_default(),
    ))
}
