//! K. Counterparty & correspondent banking

use crate::models::TransactionRecord;
use crate::verification::RuleCategory;

pub fn category() -> RuleCategory {
    RuleCategory::new("correspondent-banking", Some("counterparty"), "Counterparty & correspondent banking")
        .with_rule("COR-029", "Shell bank / unsupervised correspondent", respondent_not_shell)
        .with_rule("COR-030", "Payable-through w/o respondent assurance", payable_through_cdd_done)
}

/// COR-029
pub fn respondent_not_shell(record: &TransactionRecord) -> bool {
    !record.flag_or("respondent_shell_bank", false)
}

/// COR-030
pub fn payable_through_cdd_done(record: &TransactionRecord) -> bool {
    !(record.flag("payable_through") && !record.flag("respondent_cdd_done"))
}
