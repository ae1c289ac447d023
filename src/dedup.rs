use tracing::debug;

use crate::ledger::LedgerRecord;
use crate::normalize::norm_key;

/// Relative price tolerance: two prices within 0.5% of the larger one are
/// considered the same.
pub const PRICE_TOLERANCE: f64 = 0.005;

/// Duplicate check against the most recently appended record only. History
/// before the last row is never consulted, so only back-to-back repeats are
/// suppressed.
///
/// A record missing any of the four key fields is conservatively treated as
/// not a duplicate rather than an error.
pub fn is_duplicate(new: &LedgerRecord, existing: &[LedgerRecord]) -> bool {
    let Some(latest) = existing.last() else {
        return false;
    };

    if new.direction.trim().is_empty()
        || new.open_price.trim().is_empty()
        || new.take_profit_price.trim().is_empty()
        || new.stop_loss_price.trim().is_empty()
    {
        debug!("record missing a key field, treating as not a duplicate");
        return false;
    }

    // Direction first: a mismatch makes price similarity irrelevant.
    if norm_key(&new.direction) != norm_key(&latest.direction) {
        return false;
    }

    prices_match(&new.open_price, &latest.open_price)
        && prices_match(&new.take_profit_price, &latest.take_profit_price)
        && prices_match(&new.stop_loss_price, &latest.stop_loss_price)
}

/// Field comparison: exact normalized equality, else numeric comparison with
/// the relative tolerance. Range values ("low-high") compare on the value
/// before the hyphen. Unparsable values fall back to the (already failed)
/// exact equality.
fn prices_match(new: &str, old: &str) -> bool {
    let n = norm_key(new);
    let o = norm_key(old);
    if n == o {
        return true;
    }
    match (parse_price(&n), parse_price(&o)) {
        (Some(a), Some(b)) => {
            let diff = (a - b).abs();
            let allowed = a.max(b) * PRICE_TOLERANCE;
            diff <= allowed
        }
        _ => false,
    }
}

fn parse_price(value: &str) -> Option<f64> {
    let head = value.split('-').next().unwrap_or(value);
    head.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(direction: &str, open: &str, tp: &str, sl: &str) -> LedgerRecord {
        LedgerRecord {
            recorded_time: "20250411_132449".into(),
            direction: direction.into(),
            open_price: open.into(),
            take_profit_price: tp.into(),
            stop_loss_price: sl.into(),
        }
    }

    #[test]
    fn empty_history_is_never_a_duplicate() {
        let new = record("short", "80500-81300", "78000", "83500");
        assert!(!is_duplicate(&new, &[]));
    }

    #[test]
    fn identical_record_is_a_duplicate() {
        let existing = [record("short", "80500-81300", "78000", "83500")];
        let new = record("short", "80500-81300", "78000", "83500");
        assert!(is_duplicate(&new, &existing));
    }

    #[test]
    fn separator_and_whitespace_formatting_is_ignored() {
        let existing = [record("short", "80500-81300", "78000", "83500")];
        let new = record(" Short ", "80,500-81,300", " 78,000", "83,500 ");
        assert!(is_duplicate(&new, &existing));
    }

    #[test]
    fn different_direction_is_never_a_duplicate() {
        let existing = [record("short", "80500-81300", "78000", "83500")];
        let new = record("long", "80500-81300", "78000", "83500");
        assert!(!is_duplicate(&new, &existing));
    }

    #[test]
    fn single_value_far_from_range_start_is_new() {
        let existing = [record("short", "80500-81300", "78000", "83500")];
        // 81300 vs range start 80500 is ~1% apart, above the 0.5% tolerance.
        let new = record("short", "81300", "78000", "83500");
        assert!(!is_duplicate(&new, &existing));
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        // 80000 vs 80400: diff 400, allowed 80400 * 0.005 = 402 -> duplicate.
        let existing = [record("long", "80000", "83000", "79000")];
        let at_boundary = record("long", "80400", "83000", "79000");
        assert!(is_duplicate(&at_boundary, &existing));

        // 80000 vs 80500: diff 500, allowed 402.5 -> not a duplicate.
        let above = record("long", "80500", "83000", "79000");
        assert!(!is_duplicate(&above, &existing));
    }

    #[test]
    fn unparsable_prices_fall_back_to_string_equality() {
        let existing = [record("long", "market", "83000", "79000")];
        assert!(is_duplicate(&record("long", "Market", "83000", "79000"), &existing));
        assert!(!is_duplicate(&record("long", "limit", "83000", "79000"), &existing));
    }

    #[test]
    fn missing_key_field_is_not_a_duplicate() {
        let existing = [record("short", "80500", "78000", "83500")];
        let new = record("short", "80500", "", "83500");
        assert!(!is_duplicate(&new, &existing));
    }

    #[test]
    fn only_the_latest_record_is_consulted() {
        let existing = [
            record("short", "80500", "78000", "83500"),
            record("long", "81000", "83259", "80000"),
        ];
        // Matches the first record, but only the last one is the window.
        let new = record("short", "80500", "78000", "83500");
        assert!(!is_duplicate(&new, &existing));
    }
}
