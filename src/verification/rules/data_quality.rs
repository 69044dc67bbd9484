//! O. Data quality
//!
//! DQ-039 is a heuristic. Name and account classification rely on keyword
//! and prefix lists, not on any registry of legal entities or account
//! types, and will misclassify some inputs.

use crate::models::TransactionRecord;
use crate::verification::RuleCategory;

/// Accepted account identifier length (IBAN-style bounds)
pub const ACCOUNT_LEN_RANGE: std::ops::RangeInclusive<usize> = 15..=34;

/// Corporate suffix tokens, matched as substrings of the lowercased name
const COMPANY_MARKERS: &[&str] = &[" ltd", " inc", " co", " pty", " llc"];

const PERSONAL_ACCOUNT_PREFIXES: &[&str] = &["retail", "pers"];
const BUSINESS_ACCOUNT_PREFIXES: &[&str] = &["biz", "corp"];

/// Narrative hints that the payment is made for someone else
const THIRD_PARTY_MARKERS: &[&str] = &["third", "on behalf", "obo"];

pub fn category() -> RuleCategory {
    RuleCategory::new("data-quality", Some("dataquality"), "Data quality")
        .with_rule("DQ-038", "Invalid account number format (IBAN/BIC)", account_format_valid)
        .with_rule("DQ-039", "Beneficiary type mismatch", beneficiary_type_consistent)
        .with_rule("DQ-040", "Originator equals beneficiary with conflicting purpose", self_transfer_purpose_consistent)
}

/// DQ-038: non-empty, alphanumeric only, 15 to 34 characters
pub fn account_format_valid(record: &TransactionRecord) -> bool {
    let account = record.text("beneficiary_account").trim();
    !account.is_empty()
        && account.chars().all(char::is_alphanumeric)
        && ACCOUNT_LEN_RANGE.contains(&account.chars().count())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameKind {
    Company,
    Personal,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccountKind {
    Personal,
    Business,
    Unknown,
}

fn classify_name(name: &str) -> NameKind {
    if COMPANY_MARKERS.iter().any(|m| name.contains(m)) {
        return NameKind::Company;
    }
    let mut letters = name.chars().filter(|c| *c != ' ').peekable();
    if letters.peek().is_some() && letters.all(char::is_alphabetic) {
        NameKind::Personal
    } else {
        NameKind::Unknown
    }
}

fn classify_account(account: &str) -> AccountKind {
    if PERSONAL_ACCOUNT_PREFIXES.iter().any(|p| account.starts_with(p)) {
        AccountKind::Personal
    } else if BUSINESS_ACCOUNT_PREFIXES.iter().any(|p| account.starts_with(p)) {
        AccountKind::Business
    } else {
        AccountKind::Unknown
    }
}

/// DQ-039: company names on personal-looking accounts and vice versa.
/// Missing name or account fails.
pub fn beneficiary_type_consistent(record: &TransactionRecord) -> bool {
    let name = record.text("beneficiary_name").to_lowercase();
    let account = record.text("beneficiary_account").to_lowercase();
    let (name, account) = (name.trim(), account.trim());

    if name.is_empty() || account.is_empty() {
        return false;
    }

    !matches!(
        (classify_name(name), classify_account(account)),
        (NameKind::Company, AccountKind::Personal) | (NameKind::Personal, AccountKind::Business)
    )
}

/// DQ-040: same party on both sides, cross-border, with a third-party narrative
pub fn self_transfer_purpose_consistent(record: &TransactionRecord) -> bool {
    let originator = record.text("originator_name").trim();
    let beneficiary = record.text("beneficiary_name").trim();
    let originator_country = record.text("originator_country").trim();
    let beneficiary_country = record.text("beneficiary_country").trim();
    let narrative = record.text("narrative").to_lowercase();

    let same_name = !originator.is_empty() && originator == beneficiary;
    let cross_border = !originator_country.is_empty()
        && !beneficiary_country.is_empty()
        && originator_country != beneficiary_country;
    let third_party = THIRD_PARTY_MARKERS.iter().any(|m| narrative.contains(m));

    !(same_name && cross_border && third_party)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::rules::fixtures::record;
    use serde_json::json;

    #[test]
    fn test_dq038_account_format() {
        assert!(account_format_valid(&record(json!({
            "beneficiary_account": "GB29NWBK60161331",
        }))));
        assert!(account_format_valid(&record(json!({
            "beneficiary_account": "ABCDEFGHIJ1234567890",
        }))));
        assert!(!account_format_valid(&record(json!({
            "beneficiary_account": "ABCDE12345",
        }))));
        assert!(!account_format_valid(&record(json!({
            "beneficiary_account": "ABCDEFGHIJ-123456789",
        }))));
        assert!(account_format_valid(&record(json!({
            "beneficiary_account": "  ABCDEFGHIJ1234567890 ",
        }))));
        assert!(!account_format_valid(&record(json!({}))));
    }

    #[test]
    fn test_dq039_company_on_personal_account() {
        assert!(!beneficiary_type_consistent(&record(json!({
            "beneficiary_name": "Acme Trading Pte Ltd",
            "beneficiary_account": "RETAIL-0042",
        }))));
        assert!(beneficiary_type_consistent(&record(json!({
            "beneficiary_name": "Acme Trading Pte Ltd",
            "beneficiary_account": "CORP-0042",
        }))));
    }

    #[test]
    fn test_dq039_person_on_business_account() {
        assert!(!beneficiary_type_consistent(&record(json!({
            "beneficiary_name": "Jane Doe",
            "beneficiary_account": "BIZ77821",
        }))));
        assert!(beneficiary_type_consistent(&record(json!({
            "beneficiary_name": "Jane Doe",
            "beneficiary_account": "PERS77821",
        }))));
        assert!(beneficiary_type_consistent(&record(json!({
            "beneficiary_name": "Jane Doe 2nd",
            "beneficiary_account": "BIZ77821",
        }))));
    }

    #[test]
    fn test_dq039_missing_values_fail() {
        assert!(!beneficiary_type_consistent(&record(json!({
            "beneficiary_name": "Jane Doe",
        }))));
        assert!(!beneficiary_type_consistent(&record(json!({
            "beneficiary_name": "   ",
            "beneficiary_account": "PERS77821",
        }))));
    }

    #[test]
    fn test_dq040_self_transfer_on_behalf() {
        let data = json!({
            "originator_name": "Jane Doe",
            "beneficiary_name": "Jane Doe",
            "originator_country": "SG",
            "beneficiary_country": "HK",
            "narrative": "Payment on behalf of client",
        });
        assert!(!self_transfer_purpose_consistent(&record(data.clone())));

        let mut domestic = data.clone();
        domestic["beneficiary_country"] = json!("SG");
        assert!(self_transfer_purpose_consistent(&record(domestic)));

        let mut own_funds = data;
        own_funds["narrative"] = json!("Savings transfer");
        assert!(self_transfer_purpose_consistent(&record(own_funds)));
    }
}
