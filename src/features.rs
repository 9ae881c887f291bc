//! Feature reconciliation for heart disease model inference.
//!
//! A client submits features as an unordered name → value mapping. Tabular
//! models consume positional rows, so the row is always built by walking the
//! model's declared feature names, never by iterating the input.

use crate::error::{PredictError, PredictResult};
use crate::types::record::FeatureRecord;
use serde::Deserialize;
use tracing::debug;

/// What to do with submitted features the model does not declare
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFeaturePolicy {
    /// Drop them silently (logged at debug)
    #[default]
    Ignore,
    /// Fail the request with a client error
    Reject,
}

/// Builds model rows from client feature records.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureReconciler {
    policy: UnknownFeaturePolicy,
}

impl FeatureReconciler {
    pub fn new(policy: UnknownFeaturePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UnknownFeaturePolicy {
        self.policy
    }

    /// Build a single row in `declared` order.
    ///
    /// Fails on the first declared feature that is absent or non-numeric,
    /// and, under [`UnknownFeaturePolicy::Reject`], on the first submitted
    /// feature the model does not declare.
    pub fn reconcile(&self, declared: &[String], record: &FeatureRecord) -> PredictResult<Vec<f64>> {
        let mut row = Vec::with_capacity(declared.len());

        for name in declared {
            match record.numeric(name)? {
                Some(value) => row.push(value),
                None => return Err(PredictError::MissingFeature(name.clone())),
            }
        }

        let mut unknown = record
            .names()
            .filter(|name| !declared.iter().any(|d| d == name));

        match self.policy {
            UnknownFeaturePolicy::Reject => {
                if let Some(name) = unknown.next() {
                    return Err(PredictError::UnknownFeature(name.to_string()));
                }
            }
            UnknownFeaturePolicy::Ignore => {
                let ignored: Vec<&str> = unknown.collect();
                if !ignored.is_empty() {
                    debug!(ignored = ?ignored, "Ignoring undeclared features");
                }
            }
        }

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::patient::FEATURE_NAMES;

    fn declared() -> Vec<String> {
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
    }

    fn complete_record() -> FeatureRecord {
        FeatureRecord::new()
            .with("Age", 54)
            .with("Sex", 1)
            .with("ChestPainType", 0)
            .with("Cholesterol", 246)
            .with("FastingBS", 0)
            .with("MaxHR", 150)
            .with("ExerciseAngina", 0)
            .with("Oldpeak", 0.0)
            .with("ST_Slope", 1)
    }

    #[test]
    fn test_row_follows_declared_order() {
        let reconciler = FeatureReconciler::default();
        let row = reconciler.reconcile(&declared(), &complete_record()).unwrap();

        assert_eq!(
            row,
            vec![54.0, 1.0, 0.0, 246.0, 0.0, 150.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_declared_order_wins_over_input_order() {
        let reconciler = FeatureReconciler::default();
        let mut declared = declared();
        declared.reverse();

        let row = reconciler.reconcile(&declared, &complete_record()).unwrap();
        assert_eq!(row[0], 1.0); // ST_Slope
        assert_eq!(row[8], 54.0); // Age
    }

    #[test]
    fn test_missing_feature() {
        let reconciler = FeatureReconciler::default();
        let mut record = complete_record();
        record.remove("Cholesterol");

        match reconciler.reconcile(&declared(), &record) {
            Err(PredictError::MissingFeature(name)) => assert_eq!(name, "Cholesterol"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_extra_features_ignored_by_default() {
        let reconciler = FeatureReconciler::default();
        let record = complete_record().with("RestingBP", 130);

        let row = reconciler.reconcile(&declared(), &record).unwrap();
        assert_eq!(row.len(), FEATURE_NAMES.len());
    }

    #[test]
    fn test_extra_features_rejected_in_strict_mode() {
        let reconciler = FeatureReconciler::new(UnknownFeaturePolicy::Reject);
        let record = complete_record().with("RestingBP", 130);

        match reconciler.reconcile(&declared(), &record) {
            Err(PredictError::UnknownFeature(name)) => assert_eq!(name, "RestingBP"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_reported_before_unknown() {
        let reconciler = FeatureReconciler::new(UnknownFeaturePolicy::Reject);
        let mut record = complete_record().with("RestingBP", 130);
        record.remove("Age");

        assert!(matches!(
            reconciler.reconcile(&declared(), &record),
            Err(PredictError::MissingFeature(_))
        ));
    }

    #[test]
    fn test_non_numeric_feature() {
        let reconciler = FeatureReconciler::default();
        let record = complete_record().with("MaxHR", "high");

        assert!(matches!(
            reconciler.reconcile(&declared(), &record),
            Err(PredictError::MalformedFeature { .. })
        ));
    }
}
