//! G. FX reasonableness & fair dealing

use crate::models::TransactionRecord;
use crate::verification::RuleCategory;

/// Largest acceptable spread, either side of mid, in basis points
pub const MAX_FX_SPREAD_BPS: i64 = 150;

pub fn category() -> RuleCategory {
    RuleCategory::new("fx-checks", Some("fx"), "FX reasonableness & fair dealing")
        .with_rule("FX-017", "FX spread outlier for fairness review", fx_spread_reasonable)
        .with_rule("FX-018", "Advised FX trade without suitability", advised_complex_fx_assessed)
}

/// FX-017
pub fn fx_spread_reasonable(record: &TransactionRecord) -> bool {
    !(record.flag("fx_indicator") && record.int("fx_spread_bps").abs() > MAX_FX_SPREAD_BPS)
}

/// FX-018
pub fn advised_complex_fx_assessed(record: &TransactionRecord) -> bool {
    !(record.flag("is_advised")
        && record.flag_or("product_complex", false)
        && !record.flag("suitability_assessed"))
}
