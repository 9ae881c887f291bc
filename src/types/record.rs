//! Client-submitted feature records

use crate::error::{PredictError, PredictResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Feature name to numeric value mapping as submitted by a client.
///
/// Key order and extra keys are arbitrary; reconciliation against the
/// model's declared feature order happens in [`crate::features`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord(Map<String, Value>);

impl FeatureRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a record from an arbitrary JSON value.
    ///
    /// Anything other than a JSON object is rejected.
    pub fn from_value(value: Value) -> PredictResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(PredictError::MalformedPayload(format!(
                "expected a JSON object of features, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Set a feature value, replacing any previous one
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`FeatureRecord::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Remove a feature, returning its previous value
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Numeric value of a feature.
    ///
    /// Returns `Ok(None)` when absent and an error when present but not a
    /// finite number.
    pub fn numeric(&self, name: &str) -> PredictResult<Option<f64>> {
        let Some(value) = self.0.get(name) else {
            return Ok(None);
        };

        match value.as_f64() {
            Some(v) if v.is_finite() => Ok(Some(v)),
            Some(_) => Err(PredictError::MalformedFeature {
                name: name.to_string(),
                reason: "value is not finite".to_string(),
            }),
            None => Err(PredictError::MalformedFeature {
                name: name.to_string(),
                reason: format!("expected a number, got {}", json_type_name(value)),
            }),
        }
    }

    /// Feature names in the record
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
