//! Rule catalogue and status aggregation
//!
//! Rules are pure predicates over a transaction record. Each category runs
//! its rules independently and reduces the outcomes to a tri-state status.
//! Deterministic, synchronous, no shared state.

use crate::models::{OverallStatus, RuleResult, TransactionRecord};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;

pub mod rules;

/// Trait for a single compliance rule
pub trait ComplianceRule: Send + Sync {
    /// Stable identifier, used as a key by downstream consumers
    fn id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    /// `true` when the rule is satisfied. Must be total over any record.
    fn check(&self, record: &TransactionRecord) -> bool;
}

pub type Predicate = fn(&TransactionRecord) -> bool;

/// Rule backed by a plain function
pub struct PredicateRule {
    id: &'static str,
    title: &'static str,
    predicate: Predicate,
}

impl PredicateRule {
    pub const fn new(id: &'static str, title: &'static str, predicate: Predicate) -> Self {
        Self {
            id,
            title,
            predicate,
        }
    }
}

impl ComplianceRule for PredicateRule {
    fn id(&self) -> &'static str {
        self.id
    }

    fn title(&self) -> &'static str {
        self.title
    }

    fn check(&self, record: &TransactionRecord) -> bool {
        (self.predicate)(record)
    }
}

//
// ================= Status Aggregation =================
//

/// All passed → pass, none passed → fail, a mix → needs_advice.
/// An empty result is vacuously a pass.
pub fn aggregate_status(results: &RuleResult) -> OverallStatus {
    let mut any_passed = false;
    let mut any_failed = false;

    for passed in results.values() {
        if passed {
            any_passed = true;
        } else {
            any_failed = true;
        }
    }

    match (any_passed, any_failed) {
        (_, false) => OverallStatus::Pass,
        (true, true) => OverallStatus::NeedsAdvice,
        (false, true) => OverallStatus::Fail,
    }
}

/// Outcome of one category. The status is derived from `tests` on every
/// read and on serialization; it is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryResult {
    pub tests: RuleResult,
}

impl CategoryResult {
    pub fn new(tests: RuleResult) -> Self {
        Self { tests }
    }

    pub fn overall_status(&self) -> OverallStatus {
        aggregate_status(&self.tests)
    }
}

impl Serialize for CategoryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CategoryResult", 2)?;
        state.serialize_field("overall_status", &self.overall_status())?;
        state.serialize_field("tests", &self.tests)?;
        state.end()
    }
}

//
// ================= Categories =================
//

/// A named group of rules evaluated together
pub struct RuleCategory {
    task: &'static str,
    output_key: Option<&'static str>,
    title: &'static str,
    rules: Vec<Box<dyn ComplianceRule>>,
}

impl RuleCategory {
    pub fn new(task: &'static str, output_key: Option<&'static str>, title: &'static str) -> Self {
        Self {
            task,
            output_key,
            title,
            rules: Vec::new(),
        }
    }

    pub fn add_rule(&mut self, rule: Box<dyn ComplianceRule>) {
        debug_assert!(
            self.rules.iter().all(|r| r.id() != rule.id()),
            "duplicate rule id {}",
            rule.id()
        );
        self.rules.push(rule);
    }

    /// Builder-style registration of a function rule
    pub fn with_rule(mut self, id: &'static str, title: &'static str, predicate: Predicate) -> Self {
        self.add_rule(Box::new(PredicateRule::new(id, title, predicate)));
        self
    }

    /// Task name this category is dispatched under
    pub fn task(&self) -> &'static str {
        self.task
    }

    /// Key wrapping the result in the job output, if the category reports one
    pub fn output_key(&self) -> Option<&'static str> {
        self.output_key
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn rules(&self) -> &[Box<dyn ComplianceRule>] {
        &self.rules
    }

    /// Run every rule against the record (SYNC, side-effect free)
    pub fn evaluate(&self, record: &TransactionRecord) -> CategoryResult {
        let mut tests = RuleResult::new();

        for rule in &self.rules {
            tests.insert(rule.id(), rule.check(record));
        }

        let result = CategoryResult::new(tests);

        debug!(
            task = self.task,
            rule_count = self.rules.len(),
            overall_status = %result.overall_status(),
            "Category evaluated"
        );

        result
    }

    /// Shape a result into the job output mapping
    pub fn output(&self, result: &CategoryResult) -> crate::Result<Value> {
        match self.output_key {
            Some(key) => {
                let mut out = Map::new();
                out.insert(key.to_string(), serde_json::to_value(result)?);
                Ok(Value::Object(out))
            }
            None => Ok(json!({})),
        }
    }

    /// Catalogue description of this category
    pub fn describe(&self) -> Value {
        json!({
            "task": self.task,
            "output_key": self.output_key,
            "title": self.title,
            "rules": self
                .rules
                .iter()
                .map(|r| json!({ "id": r.id(), "title": r.title() }))
                .collect::<Vec<_>>(),
        })
    }
}

/// The closed set of rule categories
pub struct RuleCatalogue {
    categories: Vec<Arc<RuleCategory>>,
}

impl RuleCatalogue {
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    pub fn add_category(&mut self, category: RuleCategory) {
        self.categories.push(Arc::new(category));
    }

    pub fn get(&self, task: &str) -> Option<Arc<RuleCategory>> {
        self.categories.iter().find(|c| c.task() == task).cloned()
    }

    pub fn categories(&self) -> impl Iterator<Item = &Arc<RuleCategory>> {
        self.categories.iter()
    }

    pub fn describe(&self) -> Value {
        Value::Array(self.categories.iter().map(|c| c.describe()).collect())
    }
}

impl Default for RuleCatalogue {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the catalogue with every built-in category
pub fn create_default_catalogue() -> RuleCatalogue {
    let mut catalogue = RuleCatalogue::new();
    catalogue.add_category(rules::wire::category());
    catalogue.add_category(rules::cdd::category());
    catalogue.add_category(rules::suspicion::category());
    catalogue.add_category(rules::sanctions::category());
    catalogue.add_category(rules::cash::category());
    catalogue.add_category(rules::purpose::category());
    catalogue.add_category(rules::fx::category());
    catalogue.add_category(rules::suitability::category());
    catalogue.add_category(rules::virtual_assets::category());
    catalogue.add_category(rules::channel::category());
    catalogue.add_category(rules::correspondent::category());
    catalogue.add_category(rules::record_keeping::category());
    catalogue.add_category(rules::data_quality::category());
    catalogue.add_category(rules::extension::pricing_conflicts());
    catalogue.add_category(rules::extension::behavioural());
    catalogue
}

//
// ================= Tests =================
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn results(values: &[(&str, bool)]) -> RuleResult {
        values
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_aggregate_status() {
        assert_eq!(aggregate_status(&RuleResult::new()), OverallStatus::Pass);
        assert_eq!(
            aggregate_status(&results(&[("A", true), ("B", true)])),
            OverallStatus::Pass
        );
        assert_eq!(
            aggregate_status(&results(&[("A", true), ("B", false)])),
            OverallStatus::NeedsAdvice
        );
        assert_eq!(
            aggregate_status(&results(&[("A", false), ("B", false)])),
            OverallStatus::Fail
        );
        assert_eq!(aggregate_status(&results(&[("A", false)])), OverallStatus::Fail);
    }

    #[test]
    fn test_category_result_status_follows_tests() {
        let mut result = CategoryResult::new(results(&[("A", true)]));
        assert_eq!(result.overall_status(), OverallStatus::Pass);

        result.tests.insert("B", false);
        assert_eq!(result.overall_status(), OverallStatus::NeedsAdvice);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["overall_status"], "needs_advice");
        assert_eq!(json["tests"]["B"], false);
    }

    #[test]
    fn test_deserialized_status_is_recomputed() {
        let result: CategoryResult = serde_json::from_value(json!({
            "overall_status": "pass",
            "tests": { "A": false }
        }))
        .unwrap();
        assert_eq!(result.overall_status(), OverallStatus::Fail);
    }

    #[test]
    fn test_catalogue_has_unique_tasks_and_rule_ids() {
        let catalogue = create_default_catalogue();
        let mut tasks = HashSet::new();
        let mut keys = HashSet::new();
        let mut ids = HashSet::new();

        for category in catalogue.categories() {
            assert!(tasks.insert(category.task()), "duplicate task {}", category.task());
            if let Some(key) = category.output_key() {
                assert!(keys.insert(key), "duplicate output key {}", key);
            }
            for rule in category.rules() {
                assert!(ids.insert(rule.id()), "duplicate rule {}", rule.id());
            }
        }

        assert_eq!(tasks.len(), 15);
        assert_eq!(keys.len(), 13);
        assert_eq!(ids.len(), 33);
    }

    #[test]
    fn test_output_keys_match_contract() {
        let catalogue = create_default_catalogue();
        let expected = [
            ("wire-transparency", Some("wire")),
            ("cdd-kyc", Some("cdd")),
            ("str-handling", Some("str")),
            ("sanctions", Some("sanctions")),
            ("cash-transactions", Some("cash")),
            ("purpose-checks", Some("purpose")),
            ("fx-checks", Some("fx")),
            ("suitability-checks", Some("suitability")),
            ("virtual-assets", Some("virtual")),
            ("channel-consistency", Some("channel")),
            ("correspondent-banking", Some("counterparty")),
            ("record-keeping", Some("record")),
            ("data-quality", Some("dataquality")),
            ("pricing-conflicts", None),
            ("behavioural-tests", None),
        ];

        for (task, key) in expected {
            let category = catalogue.get(task).unwrap();
            assert_eq!(category.output_key(), key, "task {}", task);
        }
    }

    #[test]
    fn test_every_rule_is_total_on_empty_record() {
        let catalogue = create_default_catalogue();
        let empty = TransactionRecord::new();

        for category in catalogue.categories() {
            let result = category.evaluate(&empty);
            assert_eq!(result.tests.len(), category.rules().len());
        }
    }

    #[test]
    fn test_output_wraps_under_category_key() {
        let catalogue = create_default_catalogue();
        let wire = catalogue.get("wire-transparency").unwrap();
        let out = wire.output(&wire.evaluate(&TransactionRecord::new())).unwrap();

        assert_eq!(out["wire"]["overall_status"], "pass");
        assert_eq!(out["wire"]["tests"].as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_extension_categories_are_empty_passes() {
        let catalogue = create_default_catalogue();
        for task in ["pricing-conflicts", "behavioural-tests"] {
            let category = catalogue.get(task).unwrap();
            let result = category.evaluate(&TransactionRecord::new());
            assert!(result.tests.is_empty());
            assert_eq!(result.overall_status(), OverallStatus::Pass);
            assert_eq!(category.output(&result).unwrap(), json!({}));
        }
    }
}
