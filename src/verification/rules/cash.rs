//! E. Cash structuring & ID
//!
//! Daily totals and counts arrive pre-aggregated; nothing here looks at
//! transaction history.

use crate::models::TransactionRecord;
use crate::verification::RuleCategory;

pub const DAILY_CASH_TOTAL_LIMIT: f64 = 20_000.0;
pub const DAILY_CASH_COUNT_LIMIT: i64 = 5;

const CASH_PRODUCTS: &[&str] = &["cash_deposit", "cash_withdrawal"];

pub fn category() -> RuleCategory {
    RuleCategory::new("cash-transactions", Some("cash"), "Cash structuring & ID")
        .with_rule("CASH-013", "Missing ID verification for cash transaction", cash_id_verified)
        .with_rule("CASH-014", "Structuring pattern below reporting thresholds", daily_cash_within_limits)
}

/// CASH-013
pub fn cash_id_verified(record: &TransactionRecord) -> bool {
    !(record.text_in("product_type", CASH_PRODUCTS) && !record.flag("cash_id_verified"))
}

/// CASH-014: total strictly above the limit, or count at the limit, is a violation
pub fn daily_cash_within_limits(record: &TransactionRecord) -> bool {
    !(record.float("daily_cash_total_customer") > DAILY_CASH_TOTAL_LIMIT
        || record.int("daily_cash_txn_count") >= DAILY_CASH_COUNT_LIMIT)
}
