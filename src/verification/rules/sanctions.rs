//! D. Sanctions & geography

use crate::models::TransactionRecord;
use crate::verification::RuleCategory;

/// Comprehensively sanctioned jurisdictions (ISO 3166 alpha-2)
pub const SANCTIONED_COUNTRIES: &[&str] = &["IR", "KP"];

pub fn category() -> RuleCategory {
    RuleCategory::new("sanctions", Some("sanctions"), "Sanctions & geography")
        .with_rule("SAN-011", "Counterparty in sanctioned country/list", no_sanctioned_country)
        .with_rule("SAN-012", "High-risk corridor with vague purpose", corridor_purpose_stated)
}

/// SAN-011
pub fn no_sanctioned_country(record: &TransactionRecord) -> bool {
    !(record.text_in("originator_country", SANCTIONED_COUNTRIES)
        || record.text_in("beneficiary_country", SANCTIONED_COUNTRIES))
}

/// SAN-012
pub fn corridor_purpose_stated(record: &TransactionRecord) -> bool {
    !(record.flag("high_risk_corridor") && !record.flag("swift_f70_purpose"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::rules::fixtures::record;
    use serde_json::json;

    #[test]
    fn test_san011_either_side() {
        assert!(no_sanctioned_country(&record(json!({
            "originator_country": "SG",
            "beneficiary_country": "GB",
        }))));
        assert!(!no_sanctioned_country(&record(json!({
            "originator_country": "IR",
        }))));
        assert!(!no_sanctioned_country(&record(json!({
            "originator_country": "SG",
            "beneficiary_country": "KP",
        }))));
    }

    #[test]
    fn test_san012_corridor_needs_purpose() {
        assert!(!corridor_purpose_stated(&record(json!({
            "high_risk_corridor": true,
            "swift_f70_purpose": "",
        }))));
        assert!(corridor_purpose_stated(&record(json!({
            "high_risk_corridor": true,
            "swift_f70_purpose": "INV 2024-118 machine parts",
        }))));
        assert!(corridor_purpose_stated(&record(json!({}))));
    }
}
