//! B. CDD / KYC freshness & EDD
//!
//! Date rules here fail when either date is missing or unparseable.

use crate::models::TransactionRecord;
use crate::verification::RuleCategory;

const SOW_SENSITIVE_CUSTOMER_TYPES: &[&str] = &["domiciliary_company", "trust"];

pub fn category() -> RuleCategory {
    RuleCategory::new("cdd-kyc", Some("cdd"), "CDD / KYC freshness & EDD")
        .with_rule("CDD-005", "KYC overdue beyond due date", kyc_within_due_date)
        .with_rule("CDD-006", "PEP without required EDD", pep_edd_performed)
        .with_rule("CDD-007", "High-risk customer overdue periodic review", high_risk_review_current)
        .with_rule("CDD-008", "Missing SOW for PEP or high-risk entity", source_of_wealth_documented)
}

/// CDD-005: a booking on the due date itself is still in time
pub fn kyc_within_due_date(record: &TransactionRecord) -> bool {
    match (record.datetime("booking_datetime"), record.date("kyc_due_date")) {
        (Some(booked), Some(due)) => booked.date() <= due,
        _ => false,
    }
}

/// CDD-006
pub fn pep_edd_performed(record: &TransactionRecord) -> bool {
    !(record.flag("customer_is_pep")
        && (!record.flag("edd_required") || !record.flag("edd_performed")))
}

/// CDD-007: only applies to high-risk customers
pub fn high_risk_review_current(record: &TransactionRecord) -> bool {
    if !record.text_eq("customer_risk_rating", "High") {
        return true;
    }
    match (record.date("kyc_last_completed"), record.date("kyc_due_date")) {
        (Some(last_completed), Some(due)) => last_completed <= due,
        _ => false,
    }
}

/// CDD-008
pub fn source_of_wealth_documented(record: &TransactionRecord) -> bool {
    !(!record.flag("sow_documented")
        && (record.flag("customer_is_pep")
            || record.text_in("customer_type", SOW_SENSITIVE_CUSTOMER_TYPES)))
}
