//! L. Record-keeping & reconstruction

use crate::models::TransactionRecord;
use crate::verification::RuleCategory;

/// Minimum retention for STR-related records, in years
pub const STR_RETENTION_YEARS: i64 = 5;

const RECONSTRUCTION_FIELDS: &[&str] = &["value_date", "amount", "beneficiary_name"];

pub fn category() -> RuleCategory {
    RuleCategory::new("record-keeping", Some("record"), "Record-keeping & reconstruction")
        .with_rule("REC-031", "Record sufficiency breach", reconstruction_fields_present)
        .with_rule("REC-032", "Retention gap for STR-related transactions", str_retention_sufficient)
}

/// REC-031
pub fn reconstruction_fields_present(record: &TransactionRecord) -> bool {
    RECONSTRUCTION_FIELDS.iter().all(|f| record.flag(f))
}

/// REC-032
pub fn str_retention_sufficient(record: &TransactionRecord) -> bool {
    !(record.flag("is_str_related") && record.int("retention_years") < STR_RETENTION_YEARS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::rules::fixtures::record;
    use serde_json::json;

    #[test]
    fn test_rec031_all_fields_required() {
        assert!(reconstruction_fields_present(&record(json!({
            "value_date": "01/03/2024",
            "amount": "150.00",
            "beneficiary_name": "Bob Lee",
        }))));
        assert!(!reconstruction_fields_present(&record(json!({
            "value_date": "01/03/2024",
            "amount": 0,
            "beneficiary_name": "Bob Lee",
        }))));
        assert!(!reconstruction_fields_present(&record(json!({}))));
    }

    #[test]
    fn test_rec032_retention() {
        assert!(!str_retention_sufficient(&record(json!({
            "is_str_related": true,
            "retention_years": "3",
        }))));
        assert!(!str_retention_sufficient(&record(json!({ "is_str_related": true }))));
        assert!(str_retention_sufficient(&record(json!({
            "is_str_related": true,
            "retention_years": 7,
        }))));
        assert!(str_retention_sufficient(&record(json!({ "retention_years": 1 }))));
    }
}
