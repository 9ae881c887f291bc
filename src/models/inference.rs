//! Inference engine for heart disease prediction

use crate::config::AppConfig;
use crate::error::PredictResult;
use crate::features::FeatureReconciler;
use crate::metrics::ServiceMetrics;
use crate::models::store::{LoadedModel, ModelStore};
use crate::types::prediction::Prediction;
use crate::types::record::FeatureRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Default decision threshold on the model score
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Model status reported by the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub model_loaded: bool,
    pub model_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Runs one request through load → reconcile → predict → label
pub struct InferenceEngine {
    store: ModelStore,
    reconciler: FeatureReconciler,
    threshold: f64,
    metrics: Arc<ServiceMetrics>,
}

impl InferenceEngine {
    /// Create an inference engine from configuration.
    ///
    /// Nothing is read from disk here; the model loads on first use or
    /// through [`InferenceEngine::preload`].
    pub fn new(config: &AppConfig) -> Self {
        let engine = Self::with_store(
            ModelStore::new(config.model.location()),
            FeatureReconciler::new(config.reconciliation.unknown_features),
            config.model.decision_threshold,
        );

        info!(
            model_path = %engine.store.location().resolve().display(),
            threshold = engine.threshold,
            unknown_features = ?config.reconciliation.unknown_features,
            "Inference engine initialized"
        );

        engine
    }

    pub fn with_store(store: ModelStore, reconciler: FeatureReconciler, threshold: f64) -> Self {
        Self {
            store,
            reconciler,
            threshold,
            metrics: Arc::new(ServiceMetrics::new()),
        }
    }

    /// Share an existing metrics collector
    pub fn with_metrics(mut self, metrics: Arc<ServiceMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Predict the label for one feature record, recording metrics
    pub fn predict(&self, record: &FeatureRecord) -> PredictResult<Prediction> {
        let start = Instant::now();
        let result = self.run(record);

        match &result {
            Ok(prediction) => self
                .metrics
                .record_prediction(start.elapsed(), prediction.label),
            Err(e) => self.metrics.record_error(e.kind()),
        }

        result
    }

    fn run(&self, record: &FeatureRecord) -> PredictResult<Prediction> {
        let loaded = self.load()?;
        let row = self
            .reconciler
            .reconcile(loaded.model.feature_names(), record)?;

        let score = loaded.model.predict(&row).map_err(|e| {
            debug!(row = ?row, error = %e, "Model rejected row");
            e
        })?;

        let prediction = Prediction::from_score(score, self.threshold);
        debug!(
            score = prediction.score,
            label = prediction.label,
            "Prediction complete"
        );

        Ok(prediction)
    }

    fn load(&self) -> PredictResult<&LoadedModel> {
        if let Some(loaded) = self.store.get() {
            return Ok(loaded);
        }

        let loaded = self.store.ensure_loaded()?;
        self.metrics.record_model_load(loaded.load_time);
        Ok(loaded)
    }

    /// Load the model ahead of the first request
    pub fn preload(&self) -> PredictResult<()> {
        self.load().map(|_| ())
    }

    pub fn health(&self) -> HealthReport {
        let loaded = self.store.get();
        HealthReport {
            status: "ok",
            model_loaded: loaded.is_some(),
            model_path: loaded
                .map(|l| l.path.clone())
                .unwrap_or_else(|| self.store.location().resolve())
                .display()
                .to_string(),
            loaded_at: loaded.map(|l| l.loaded_at),
        }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<ServiceMetrics> {
        &self.metrics
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}
