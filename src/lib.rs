//! Heart Disease Predictor Library
//!
//! Serves binary heart disease predictions from a lazily loaded classifier
//! over HTTP, plus an intake gateway that collects patient features through
//! an HTML form.

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod gateway;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod types;

pub use config::AppConfig;
pub use error::{PredictError, PredictResult};
pub use features::{FeatureReconciler, UnknownFeaturePolicy};
pub use models::inference::InferenceEngine;
pub use types::{FeatureRecord, PatientFeatures, Prediction, PredictionResponse};
