//! C. STR / suspicion handling

use chrono::NaiveDateTime;

use crate::models::{FieldValue, TransactionRecord};
use crate::verification::RuleCategory;

/// Strict timestamp format of the STR workflow fields
pub const STR_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Filing deadline after suspicion is determined (48 hours)
pub const STR_FILING_SLA_SECS: i64 = 172_800;

pub fn category() -> RuleCategory {
    RuleCategory::new("str-handling", Some("str"), "STR / suspicion handling")
        .with_rule("STR-009", "Late STR filing beyond SLA", str_filed_within_sla)
        .with_rule("STR-010", "Sanctions potential hit executed without clearance", potential_hit_not_executed)
}

/// STR-009: vacuously satisfied unless both timestamps are present.
/// Present but malformed timestamps fail.
pub fn str_filed_within_sla(record: &TransactionRecord) -> bool {
    let (Some(determined), Some(filed)) = (
        present(record, "suspicion_determined_datetime"),
        present(record, "str_filed_datetime"),
    ) else {
        return true;
    };

    match (parse_strict(determined), parse_strict(filed)) {
        (Some(determined), Some(filed)) => (filed - determined).num_seconds() <= STR_FILING_SLA_SECS,
        _ => false,
    }
}

/// STR-010
pub fn potential_hit_not_executed(record: &TransactionRecord) -> bool {
    !(record.text_eq("sanctions_screening", "potential") && record.flag_or("transaction_executed", true))
}

fn present<'a>(record: &'a TransactionRecord, key: &str) -> Option<&'a FieldValue> {
    record.get(key).filter(|v| match v {
        FieldValue::Text(s) => !s.trim().is_empty(),
        other => other.is_truthy(),
    })
}

fn parse_strict(value: &FieldValue) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.as_text()?, STR_TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::rules::fixtures::record;
    use serde_json::json;

    #[test]
    fn test_str009_over_48_hours_fails() {
        assert!(!str_filed_within_sla(&record(json!({
            "suspicion_determined_datetime": "2024-01-01T00:00:00",
            "str_filed_datetime": "2024-01-03T00:00:01",
        }))));
    }

    #[test]
    fn test_str009_exactly_48_hours_passes() {
        assert!(str_filed_within_sla(&record(json!({
            "suspicion_determined_datetime": "2024-01-01T00:00:00",
            "str_filed_datetime": "2024-01-03T00:00:00",
        }))));
    }

    #[test]
    fn test_str009_missing_timestamp_passes() {
        assert!(str_filed_within_sla(&record(json!({}))));
        assert!(str_filed_within_sla(&record(json!({
            "suspicion_determined_datetime": "2024-01-01T00:00:00",
        }))));
        assert!(str_filed_within_sla(&record(json!({
            "str_filed_datetime": "2024-01-03T00:00:01",
            "suspicion_determined_datetime": "  ",
        }))));
    }

    #[test]
    fn test_str009_malformed_timestamp_fails() {
        assert!(!str_filed_within_sla(&record(json!({
            "suspicion_determined_datetime": "2024-01-01 00:00:00",
            "str_filed_datetime": "2024-01-02T00:00:00",
        }))));
        assert!(!str_filed_within_sla(&record(json!({
            "suspicion_determined_datetime": "2024-01-01T00:00:00.500",
            "str_filed_datetime": "2024-01-02T00:00:00",
        }))));
    }

    #[test]
    fn test_str010_potential_hit() {
        assert!(!potential_hit_not_executed(&record(json!({
            "sanctions_screening": "potential",
        }))));
        assert!(potential_hit_not_executed(&record(json!({
            "sanctions_screening": "potential",
            "transaction_executed": false,
        }))));
        assert!(potential_hit_not_executed(&record(json!({
            "sanctions_screening": "clear",
        }))));
    }
}
