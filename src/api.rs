//! HTTP surface of the prediction service

use crate::error::PredictError;
use crate::models::inference::InferenceEngine;
use crate::types::prediction::PredictionResponse;
use crate::types::record::FeatureRecord;
use actix_web::{web, HttpResponse};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub const PREDICT_PATH: &str = "/heart_disease_predictor/";

/// Register the prediction service routes.
///
/// Expects `web::Data<InferenceEngine>` to be registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(web::resource(PREDICT_PATH).route(web::post().to(predict)))
        .route("/health", web::get().to(health))
        .route("/stats", web::get().to(stats));
}

/// JSON extractor settings: malformed bodies become 400 JSON errors
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, req| {
            let error = PredictError::MalformedPayload(err.to_string());
            if let Some(engine) = req.app_data::<web::Data<InferenceEngine>>() {
                engine.metrics().record_error(error.kind());
            }
            warn!(error = %error, "Rejected malformed prediction payload");
            error.into()
        })
}

async fn predict(
    engine: web::Data<InferenceEngine>,
    body: web::Json<Value>,
) -> Result<HttpResponse, actix_web::Error> {
    let request_id = Uuid::new_v4();
    let start = Instant::now();

    let record = match FeatureRecord::from_value(body.into_inner()) {
        Ok(record) => record,
        Err(e) => {
            engine.metrics().record_error(e.kind());
            warn!(request_id = %request_id, error = %e, "Rejected prediction request");
            return Err(e.into());
        }
    };
    debug!(request_id = %request_id, features = ?record, "Prediction request received");

    let worker_engine = engine.clone();
    let result = web::block(move || worker_engine.predict(&record)).await?;

    match result {
        Ok(prediction) => {
            info!(
                request_id = %request_id,
                result = prediction.label_str(),
                processing_time_us = start.elapsed().as_micros() as u64,
                "Prediction served"
            );
            Ok(HttpResponse::Ok().json(PredictionResponse::from(prediction)))
        }
        Err(e) if e.is_client_error() => {
            warn!(request_id = %request_id, error = %e, "Rejected prediction request");
            Err(e.into())
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Prediction failed");
            Err(e.into())
        }
    }
}

async fn health(engine: web::Data<InferenceEngine>) -> HttpResponse {
    HttpResponse::Ok().json(engine.health())
}

async fn stats(engine: web::Data<InferenceEngine>) -> HttpResponse {
    HttpResponse::Ok().json(engine.metrics().snapshot())
}
