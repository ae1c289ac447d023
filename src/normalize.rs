//! Shared keyword sets and cell/price normalization.
//!
//! The chat service answers in Chinese, so every keyword set carries the
//! Chinese tokens alongside English equivalents. All matching is done on
//! lowercased text; the English terms here are stored lowercase.

/// Regex fragment matching a direction token. Longer variants first so the
/// alternation does not stop at the bare character.
pub const DIRECTION_TOKEN: &str = "多单|空单|多头|空头|做多|做空|多|空|(?i:long|short)";

/// Terms marking a line as belonging to a signal table (headers or data).
pub const TABLE_TERMS: &[&str] = &[
    "方向", "开仓", "止盈", "止损", "多", "空", "direction", "entry", "target", "stop", "long", "short",
];

/// Column-header terms. A bare direction token is not a header.
pub const HEADER_TERMS: &[&str] = &[
    "方向", "开仓", "止盈", "止损", "direction", "entry", "open", "target", "stop",
];

/// Bare direction words, as they appear in data rows.
pub const DIRECTION_WORDS: &[&str] = &["多", "空", "long", "short"];

/// Entry/target/stop vocabulary.
pub const PRICE_TERMS: &[&str] = &["开仓", "止盈", "止损", "entry", "target", "stop"];

pub fn contains_any(line: &str, terms: &[&str]) -> bool {
    let lower = line.to_lowercase();
    terms.iter().any(|t| lower.contains(t))
}

pub fn has_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

/// Price cell cleanup: trim, strip thousands separators, keep a range hyphen.
pub fn clean_price(raw: &str) -> String {
    raw.trim().replace(',', "")
}

/// Normalization applied to both sides of a dedup comparison.
pub fn norm_key(value: &str) -> String {
    value.trim().to_lowercase().replace(',', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_price_keeps_range_hyphen() {
        assert_eq!(clean_price(" 80,500-81,300 "), "80500-81300");
        assert_eq!(clean_price("78,000"), "78000");
    }

    #[test]
    fn norm_key_is_case_and_separator_insensitive() {
        assert_eq!(norm_key("  Long "), "long");
        assert_eq!(norm_key("83,500"), "83500");
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        assert!(contains_any("方向: 空", TABLE_TERMS));
        assert!(contains_any("Direction: Short", HEADER_TERMS));
        assert!(!contains_any("no signal here", DIRECTION_WORDS));
    }
}
