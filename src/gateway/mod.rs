//! Intake gateway: HTML form in front of the prediction service

pub mod client;
pub mod form;
pub mod pages;
pub mod routes;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

pub use client::PredictionClient;
pub use routes::configure;

/// Failures the gateway reports to its own caller
#[derive(Debug)]
pub enum GatewayError {
    /// Prediction service unreachable, non-200, or unreadable reply
    UpstreamUnavailable(String),
    /// A form field is absent or does not parse
    InvalidField { field: String, reason: String },
    /// Request body is not a url-encoded form
    MalformedForm(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::UpstreamUnavailable(reason) => {
                write!(f, "prediction service unavailable: {}", reason)
            }
            GatewayError::InvalidField { field, reason } => {
                write!(f, "invalid field {}: {}", field, reason)
            }
            GatewayError::MalformedForm(reason) => write!(f, "malformed form: {}", reason),
        }
    }
}

impl std::error::Error for GatewayError {}

#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::UpstreamUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::InvalidField { .. } | GatewayError::MalformedForm(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            GatewayError::UpstreamUnavailable(_) => MessageBody {
                message: "Prediction API failed".to_string(),
                field: None,
            },
            GatewayError::InvalidField { field, .. } => MessageBody {
                message: self.to_string(),
                field: Some(field.clone()),
            },
            GatewayError::MalformedForm(_) => MessageBody {
                message: self.to_string(),
                field: None,
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
