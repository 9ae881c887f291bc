//! HTTP client for the prediction service

use crate::gateway::GatewayError;
use crate::types::patient::PatientFeatures;
use crate::types::prediction::PredictionResponse;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, warn};

/// Relays patient features to the prediction service
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    url: String,
}

impl PredictionClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the features and return the service's answer.
    ///
    /// Any transport failure, non-200 status or unreadable body is an
    /// [`GatewayError::UpstreamUnavailable`].
    pub async fn predict(&self, features: &PatientFeatures) -> Result<PredictionResponse, GatewayError> {
        debug!(url = %self.url, features = ?features, "Relaying prediction request");

        let response = self
            .http
            .post(&self.url)
            .json(features)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %self.url, error = %e, "Prediction service unreachable");
                GatewayError::UpstreamUnavailable(e.to_string())
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(url = %self.url, status = %status, "Prediction service returned an error");
            return Err(GatewayError::UpstreamUnavailable(format!(
                "unexpected status {}",
                status
            )));
        }

        response.json::<PredictionResponse>().await.map_err(|e| {
            warn!(url = %self.url, error = %e, "Unreadable prediction response");
            GatewayError::UpstreamUnavailable(e.to_string())
        })
    }
}
