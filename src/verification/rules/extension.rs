//! Declared extension points with no rules yet.
//!
//! Both evaluate to an empty result (status pass) and contribute nothing to
//! the job output.

use crate::verification::RuleCategory;

pub fn pricing_conflicts() -> RuleCategory {
    RuleCategory::new("pricing-conflicts", None, "Pricing & conflicts of interest")
}

pub fn behavioural() -> RuleCategory {
    RuleCategory::new("behavioural-tests", None, "Behavioural patterns")
}
