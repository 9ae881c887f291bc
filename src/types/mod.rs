//! Type definitions for the heart disease prediction service

pub mod patient;
pub mod prediction;
pub mod record;

pub use patient::PatientFeatures;
pub use prediction::{Prediction, PredictionResponse};
pub use record::FeatureRecord;
