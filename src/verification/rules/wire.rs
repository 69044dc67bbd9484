//! A. Wire transparency & travel rule

use crate::models::TransactionRecord;
use crate::verification::RuleCategory;

/// Cross-border threshold above which full originator data is required
pub const TRAVEL_RULE_THRESHOLD: f64 = 2000.0;

const WIRE_CHANNELS: &[&str] = &["SWIFT", "RTGS"];

pub fn category() -> RuleCategory {
    RuleCategory::new("wire-transparency", Some("wire"), "Wire transparency & travel rule")
        .with_rule("TR-001", "Travel Rule breach – missing originator info", originator_info_complete)
        .with_rule("TR-002", "Incomplete SWIFT :50/:59 originator/beneficiary data", swift_parties_present)
        .with_rule("TR-003", "Cover payment missing end-to-end originator data", cover_payment_transparent)
        .with_rule("TR-004", "Beneficiary-bank accepted incomplete originator data", incomplete_travel_rule_not_executed)
}

/// TR-001
pub fn originator_info_complete(record: &TransactionRecord) -> bool {
    let violation = record.text_in("channel", WIRE_CHANNELS)
        && !record.same_value("originator_country", "beneficiary_country")
        && record.float("amount") > TRAVEL_RULE_THRESHOLD
        && ["originator_name", "originator_account"]
            .iter()
            .any(|f| !record.flag(f));
    !violation
}

/// TR-002
pub fn swift_parties_present(record: &TransactionRecord) -> bool {
    !(record.flag("swift_mt")
        && (!record.flag("swift_f50_present") || !record.flag("swift_f59_present")))
}

/// TR-003
pub fn cover_payment_transparent(record: &TransactionRecord) -> bool {
    !(record.text_eq("channel", "SWIFT")
        && record.flag("ordering_institution_bic")
        && !record.flag("originator_name"))
}

/// TR-004: only an explicit `false` counts as incomplete
pub fn incomplete_travel_rule_not_executed(record: &TransactionRecord) -> bool {
    !(record.is_false("travel_rule_complete") && record.flag_or("transaction_executed", true))
}
