//! J. Channel & field consistency

use crate::models::TransactionRecord;
use crate::verification::RuleCategory;

/// Domestic instant-payment rails
const DOMESTIC_RAILS: &[&str] = &["FAST", "FPS"];

pub fn category() -> RuleCategory {
    RuleCategory::new("channel-consistency", Some("channel"), "Channel & field consistency")
        .with_rule("CON-026", "Incomplete SWIFT payment chain", swift_chain_complete)
        .with_rule("CON-027", "RTGS timing anomaly", rtgs_value_date_consistent)
        .with_rule("CON-028", "FAST/FPS used cross-border", domestic_rail_domestic)
}

/// CON-026
pub fn swift_chain_complete(record: &TransactionRecord) -> bool {
    !(record.text_eq("channel", "SWIFT")
        && (!record.flag("ordering_institution_bic") || !record.flag("beneficiary_institution_bic")))
}

/// CON-027: RTGS value date may not be later than the booking date.
/// Missing or unparseable dates fail.
pub fn rtgs_value_date_consistent(record: &TransactionRecord) -> bool {
    if !record.text_eq("channel", "RTGS") {
        return true;
    }
    match (record.date("value_date"), record.datetime("booking_datetime")) {
        (Some(value_date), Some(booked)) => value_date <= booked.date(),
        _ => false,
    }
}

/// CON-028
pub fn domestic_rail_domestic(record: &TransactionRecord) -> bool {
    !(record.text_in("channel", DOMESTIC_RAILS)
        && !record.same_value("originator_country", "beneficiary_country"))
}
