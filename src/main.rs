//! Heart Disease Prediction API - Main Entry Point
//!
//! Serves `POST /heart_disease_predictor/` backed by a lazily loaded model.

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use heart_disease_predictor::{
    api,
    config::AppConfig,
    logging,
    metrics::MetricsReporter,
    models::inference::InferenceEngine,
};
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    logging::init(&config.logging, &["prediction_api"])?;
    info!("Starting Heart Disease Prediction API");

    let engine = web::Data::new(InferenceEngine::new(&config));

    if config.model.preload {
        // Requests retry the load when preloading fails
        match engine.preload() {
            Ok(()) => info!("Model preloaded"),
            Err(e) => warn!(error = %e, "Model preload failed, deferring to first request"),
        }
    }

    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(
            engine.metrics().clone(),
            config.metrics.report_interval_secs,
        );
        tokio::spawn(reporter.start());
    }

    let bind_address = (config.server.host.clone(), config.server.port);
    info!(
        host = %bind_address.0,
        port = bind_address.1,
        "Listening for prediction requests on {}",
        api::PREDICT_PATH
    );

    let app_engine = engine.clone();
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_engine.clone())
            .configure(api::configure)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(bind_address)
        .context("Failed to bind prediction API")?
        .run()
        .await
        .context("Prediction API terminated")?;

    info!("Prediction API shutting down...");
    engine.metrics().print_summary();

    Ok(())
}
