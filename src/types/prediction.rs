//! Prediction outcomes and their wire representation

use serde::{Deserialize, Serialize};

/// Outcome of scoring one reconciled row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Raw model score
    pub score: f64,
    /// Thresholded label (`score > threshold`)
    pub label: bool,
}

impl Prediction {
    /// Apply the decision threshold to a model score
    pub fn from_score(score: f64, threshold: f64) -> Self {
        Self {
            score,
            label: score > threshold,
        }
    }

    /// Label as it travels on the wire ("True" / "False")
    pub fn label_str(&self) -> &'static str {
        label_to_wire(self.label)
    }
}

/// Successful response body: `{"result": "<label>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub result: String,
}

impl From<Prediction> for PredictionResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            result: prediction.label_str().to_string(),
        }
    }
}

impl PredictionResponse {
    /// Interpret `result` back into a boolean label
    pub fn label(&self) -> Option<bool> {
        label_from_wire(&self.result)
    }
}

pub fn label_to_wire(label: bool) -> &'static str {
    if label {
        "True"
    } else {
        "False"
    }
}

pub fn label_from_wire(value: &str) -> Option<bool> {
    match value {
        "True" => Some(true),
        "False" => Some(false),
        _ => None,
    }
}
