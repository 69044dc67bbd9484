//! Core data models for the compliance worker

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

use crate::coercion;

//
// ================= Field Values =================
//

/// Loosely-typed value of a single transaction field.
///
/// Records arrive without a schema, so every variant must be tolerated by
/// every rule. Arrays and objects are kept as `Other` rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Other(Value),
}

impl FieldValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Other(Value::Array(items)) => !items.is_empty(),
            FieldValue::Other(Value::Object(map)) => !map.is_empty(),
            FieldValue::Other(other) => !other.is_null(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

//
// ================= Transaction Record =================
//

/// Open mapping from field name to value. Any field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TransactionRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl TransactionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and fixtures
    pub fn with(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Build a record from the `data` entry of a job's variables.
    /// Missing or non-object data yields an empty record.
    pub fn from_variables(variables: &Map<String, Value>) -> Self {
        match variables.get("data") {
            Some(data @ Value::Object(_)) => {
                serde_json::from_value(data.clone()).unwrap_or_else(|e| {
                    warn!(error = %e, "Unreadable transaction data, using empty record");
                    Self::default()
                })
            }
            Some(Value::Null) | None => Self::default(),
            Some(other) => {
                warn!(kind = %json_kind(other), "Transaction data is not an object, using empty record");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw lookup. A present JSON null is returned as `Some(FieldValue::Null)`.
    pub fn raw(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Lookup that folds JSON null into "absent"
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key).filter(|v| **v != FieldValue::Null)
    }

    /// Truthiness of a field; absent fields are false
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(FieldValue::is_truthy)
    }

    /// Truthiness with a default that applies only when the key is absent.
    /// A key present with a null value is falsy.
    pub fn flag_or(&self, key: &str, default: bool) -> bool {
        match self.raw(key) {
            None => default,
            Some(value) => value.is_truthy(),
        }
    }

    /// True only for an explicit boolean `false`
    pub fn is_false(&self, key: &str) -> bool {
        matches!(self.raw(key), Some(FieldValue::Bool(false)))
    }

    /// Text value of a field, or the empty string for missing and non-text values
    pub fn text(&self, key: &str) -> &str {
        self.get(key).and_then(FieldValue::as_text).unwrap_or("")
    }

    pub fn text_eq(&self, key: &str, expected: &str) -> bool {
        self.get(key).and_then(FieldValue::as_text) == Some(expected)
    }

    pub fn text_in(&self, key: &str, allowed: &[&str]) -> bool {
        self.get(key)
            .and_then(FieldValue::as_text)
            .is_some_and(|s| allowed.contains(&s))
    }

    /// Whether two fields hold equal values (both absent counts as equal)
    pub fn same_value(&self, a: &str, b: &str) -> bool {
        self.get(a) == self.get(b)
    }

    pub fn float(&self, key: &str) -> f64 {
        coercion::to_float(self.get(key))
    }

    pub fn int(&self, key: &str) -> i64 {
        coercion::to_int(self.get(key))
    }

    pub fn datetime(&self, key: &str) -> Option<NaiveDateTime> {
        coercion::to_datetime(self.get(key).and_then(FieldValue::as_text))
    }

    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        coercion::to_date(self.get(key).and_then(FieldValue::as_text))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//
// ================= Rule Results =================
//

/// Rule id → passed. Ordered so serialized output is stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct RuleResult(BTreeMap<String, bool>);

impl RuleResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rule_id: &str, passed: bool) {
        self.0.insert(rule_id.to_string(), passed);
    }

    pub fn get(&self, rule_id: &str) -> Option<bool> {
        self.0.get(rule_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.values().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, bool)> for RuleResult {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Pass,
    NeedsAdvice,
    Fail,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OverallStatus::Pass => "pass",
            OverallStatus::NeedsAdvice => "needs_advice",
            OverallStatus::Fail => "fail",
        };
        write!(f, "{}", s)
    }
}

//
// ================= Jobs =================
//

/// One unit of work handed over by the workflow engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub task: String,
    #[serde(default)]
    pub variables: Map<String, Value>,
}

impl Job {
    pub fn new(id: impl Into<String>, task: impl Into<String>, variables: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            task: task.into(),
            variables,
        }
    }

    /// The nested transaction record, empty when absent
    pub fn record(&self) -> TransactionRecord {
        TransactionRecord::from_variables(&self.variables)
    }

    /// All variables serialized as the agent prompt
    pub fn prompt(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(&self.variables)?)
    }
}

/// Output handed back to the workflow engine for one job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub job_id: String,
    pub task: String,
    pub variables: Value,
    pub execution_time_ms: u64,
}
