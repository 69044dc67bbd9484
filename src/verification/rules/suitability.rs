//! H. Suitability / appropriateness

use crate::models::TransactionRecord;
use crate::verification::RuleCategory;

pub fn category() -> RuleCategory {
    RuleCategory::new("suitability-checks", Some("suitability"), "Suitability / appropriateness")
        .with_rule("SUIT-019", "Missing suitability for advised trade", advised_trade_assessed)
        .with_rule("SUIT-020", "Override after mismatch without justification", mismatch_not_overridden)
        .with_rule("SUIT-021", "Complex product sold to low-risk client", complex_product_acknowledged)
        .with_rule("SUIT-022", "VA exposure missing risk disclosure", va_disclosure_provided)
}

/// SUIT-019
pub fn advised_trade_assessed(record: &TransactionRecord) -> bool {
    !(record.flag("is_advised") && !record.flag("suitability_assessed"))
}

/// SUIT-020
pub fn mismatch_not_overridden(record: &TransactionRecord) -> bool {
    !(record.flag("suitability_assessed")
        && record.text_eq("suitability_result", "mismatch")
        && record.flag_or("transaction_proceeds", true))
}

/// SUIT-021
pub fn complex_product_acknowledged(record: &TransactionRecord) -> bool {
    !(record.flag("product_complex")
        && record.text_eq("client_risk_profile", "Low")
        && !record.flag_or("risk_acknowledgement", false))
}

/// SUIT-022
pub fn va_disclosure_provided(record: &TransactionRecord) -> bool {
    !(record.flag("product_has_va_exposure") && !record.flag("va_disclosure_provided"))
}
