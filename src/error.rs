//! Request-level error taxonomy for the prediction service

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Everything that can go wrong between receiving a feature record and
/// answering with a label.
#[derive(Debug)]
pub enum PredictError {
    /// Model artifact missing, unreadable or invalid
    ModelLoad { path: PathBuf, reason: String },
    /// A feature the model declares is absent from the request
    MissingFeature(String),
    /// Request carries a feature the model does not declare (strict mode only)
    UnknownFeature(String),
    /// A declared feature has a non-numeric value
    MalformedFeature { name: String, reason: String },
    /// Request body is not a JSON object
    MalformedPayload(String),
    /// Model failed while scoring the row
    Inference(String),
}

/// Result alias used by the prediction path.
pub type PredictResult<T> = Result<T, PredictError>;

impl PredictError {
    /// Short stable name, used as a metrics key.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::ModelLoad { .. } => "model_load",
            PredictError::MissingFeature(_) => "missing_feature",
            PredictError::UnknownFeature(_) => "unknown_feature",
            PredictError::MalformedFeature { .. } => "malformed_feature",
            PredictError::MalformedPayload(_) => "malformed_payload",
            PredictError::Inference(_) => "inference",
        }
    }

    /// Whether the client caused the failure.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Feature name the error refers to, if any.
    pub fn feature(&self) -> Option<&str> {
        match self {
            PredictError::MissingFeature(name) | PredictError::UnknownFeature(name) => Some(name),
            PredictError::MalformedFeature { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictError::ModelLoad { path, reason } => {
                write!(f, "failed to load model from {}: {}", path.display(), reason)
            }
            PredictError::MissingFeature(name) => write!(f, "missing feature: {}", name),
            PredictError::UnknownFeature(name) => write!(f, "unknown feature: {}", name),
            PredictError::MalformedFeature { name, reason } => {
                write!(f, "malformed feature {}: {}", name, reason)
            }
            PredictError::MalformedPayload(reason) => write!(f, "malformed payload: {}", reason),
            PredictError::Inference(reason) => write!(f, "inference failed: {}", reason),
        }
    }
}

impl std::error::Error for PredictError {}

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        match self {
            PredictError::ModelLoad { .. } | PredictError::Inference(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            PredictError::MissingFeature(_)
            | PredictError::UnknownFeature(_)
            | PredictError::MalformedFeature { .. }
            | PredictError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Server-side details stay in the logs
        let error = match self {
            PredictError::ModelLoad { .. } => "model unavailable".to_string(),
            PredictError::Inference(_) => "prediction failed".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error,
            feature: self.feature().map(str::to_string),
        })
    }
}
