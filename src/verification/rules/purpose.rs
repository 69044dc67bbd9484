//! F. Purpose & narrative quality

use crate::models::TransactionRecord;
use crate::verification::RuleCategory;

pub fn category() -> RuleCategory {
    RuleCategory::new("purpose-checks", Some("purpose"), "Purpose & narrative quality")
        .with_rule("PUR-016", "Purpose code conflicts with narrative", purpose_matches_narrative)
}

/// PUR-016: education purpose code with a commodity narrative
pub fn purpose_matches_narrative(record: &TransactionRecord) -> bool {
    !(record.text("purpose_code").contains("EDU")
        && record.text("narrative").to_lowercase().contains("copper"))
}
