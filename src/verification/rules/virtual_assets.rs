//! I. Virtual assets

use crate::models::TransactionRecord;
use crate::verification::RuleCategory;

const UNLICENSED_COUNTERPARTIES: &[&str] = &["unlicensed_vasp"];

pub fn category() -> RuleCategory {
    RuleCategory::new("virtual-assets", Some("virtual"), "Virtual assets")
        .with_rule("VA-024", "VASP unlicensed/unauthorised", vasp_licensed)
        .with_rule("VA-025", "VA travel-rule breach for VA wire-like transfer", va_parties_identified)
}

/// VA-024
pub fn vasp_licensed(record: &TransactionRecord) -> bool {
    let counterparty = record.text("counterparty").to_lowercase();
    !(record.flag("product_has_va_exposure")
        && UNLICENSED_COUNTERPARTIES.contains(&counterparty.as_str()))
}

/// VA-025
pub fn va_parties_identified(record: &TransactionRecord) -> bool {
    !(record.flag("product_has_va_exposure")
        && ["originator_name", "beneficiary_name", "beneficiary_account"]
            .iter()
            .any(|f| !record.flag(f)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::rules::fixtures::record;
    use serde_json::json;

    #[test]
    fn test_va024_unlicensed_counterparty() {
        assert!(!vasp_licensed(&record(json!({
            "product_has_va_exposure": true,
            "counterparty": "Unlicensed_VASP",
        }))));
        assert!(vasp_licensed(&record(json!({
            "product_has_va_exposure": true,
            "counterparty": "licensed_vasp",
        }))));
        assert!(vasp_licensed(&record(json!({
            "counterparty": "unlicensed_vasp",
        }))));
    }

    #[test]
    fn test_va025_parties_required() {
        assert!(!va_parties_identified(&record(json!({
            "product_has_va_exposure": true,
            "originator_name": "Alice Tan",
            "beneficiary_name": "Bob Lee",
        }))));
        assert!(va_parties_identified(&record(json!({
            "product_has_va_exposure": true,
            "originator_name": "Alice Tan",
            "beneficiary_name": "Bob Lee",
            "beneficiary_account": "0x52908400098527886E0F7030069857D2E4169EE7",
        }))));
    }
}
