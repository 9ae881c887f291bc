//! Shared helpers for integration tests

#![allow(dead_code)]

use heart_disease_predictor::error::PredictResult;
use heart_disease_predictor::models::{Classifier, OnnxModelLoader, ModelLoader, ModelLocation, ModelStore};
use heart_disease_predictor::{FeatureReconciler, InferenceEngine, PatientFeatures, UnknownFeaturePolicy};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const LOGISTIC_FIXTURE: &str = "heart_disease_model.onnx";

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Counts how often the model is loaded and asked to predict
#[derive(Debug, Default)]
pub struct LoadCounter {
    pub loads: AtomicUsize,
    pub predictions: AtomicUsize,
}

impl LoadCounter {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn predictions(&self) -> usize {
        self.predictions.load(Ordering::SeqCst)
    }
}

/// ONNX loader that reports to a [`LoadCounter`]
pub struct CountingLoader {
    inner: OnnxModelLoader,
    counter: Arc<LoadCounter>,
}

impl ModelLoader for CountingLoader {
    fn load(&self, path: &Path) -> PredictResult<Arc<dyn Classifier>> {
        self.counter.loads.fetch_add(1, Ordering::SeqCst);
        let model = self.inner.load(path)?;
        Ok(Arc::new(CountingClassifier {
            inner: model,
            counter: self.counter.clone(),
        }))
    }
}

#[derive(Debug)]
struct CountingClassifier {
    inner: Arc<dyn Classifier>,
    counter: Arc<LoadCounter>,
}

impl Classifier for CountingClassifier {
    fn feature_names(&self) -> &[String] {
        self.inner.feature_names()
    }

    fn predict(&self, row: &[f64]) -> PredictResult<f64> {
        self.counter.predictions.fetch_add(1, Ordering::SeqCst);
        self.inner.predict(row)
    }
}

/// Engine reading `path` through a counting loader
pub fn counted_engine(path: impl Into<PathBuf>, policy: UnknownFeaturePolicy) -> (InferenceEngine, Arc<LoadCounter>) {
    let counter = Arc::new(LoadCounter::default());
    let loader = Arc::new(CountingLoader {
        inner: OnnxModelLoader::new(),
        counter: counter.clone(),
    });
    let store = ModelStore::with_loader(ModelLocation::file(path), loader);
    let engine = InferenceEngine::with_store(store, FeatureReconciler::new(policy), 0.5);
    (engine, counter)
}

/// Patient that the logistic fixture scores below the threshold
pub fn low_risk_patient() -> PatientFeatures {
    PatientFeatures {
        age: 54,
        sex: 1,
        chest_pain_type: 0,
        cholesterol: 246,
        fasting_bs: 0,
        max_hr: 150,
        exercise_angina: 0,
        oldpeak: 0.0,
        st_slope: 1,
    }
}

/// Patient that the logistic fixture scores above the threshold
pub fn high_risk_patient() -> PatientFeatures {
    PatientFeatures {
        exercise_angina: 1,
        oldpeak: 2.0,
        st_slope: 0,
        ..low_risk_patient()
    }
}

/// Score the logistic fixture assigns to `patient`, computed independently
pub fn fixture_score(patient: &PatientFeatures) -> f64 {
    let coefficients = [0.04, 1.2, -0.8, 0.004, 1.0, -0.03, 1.1, 0.7, -1.3];
    let row = [
        patient.age as f64,
        patient.sex as f64,
        patient.chest_pain_type as f64,
        patient.cholesterol as f64,
        patient.fasting_bs as f64,
        patient.max_hr as f64,
        patient.exercise_angina as f64,
        patient.oldpeak,
        patient.st_slope as f64,
    ];
    let z: f64 = 0.5 + coefficients.iter().zip(row.iter()).map(|(c, x)| c * x).sum::<f64>();
    1.0 / (1.0 + (-z).exp())
}
