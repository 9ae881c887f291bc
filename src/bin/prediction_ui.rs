//! Heart Disease Intake Gateway - Main Entry Point
//!
//! Serves the `/checkheartdisease` form and relays submissions to the
//! prediction API configured through `PREDICTOR_API`.

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use heart_disease_predictor::{config::AppConfig, gateway, logging};
use std::time::Duration;
use tracing::info;

#[actix_web::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    logging::init(&config.logging, &["prediction_ui"])?;
    info!("Starting Heart Disease Intake Gateway");

    let client = gateway::PredictionClient::new(
        config.gateway.predictor_api.clone(),
        Duration::from_millis(config.gateway.timeout_ms),
    )?;
    info!(predictor_api = %client.url(), "Prediction API configured");

    let client = web::Data::new(client);
    let bind_address = (config.server.host.clone(), config.server.port);
    info!(host = %bind_address.0, port = bind_address.1, "Serving intake form");

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(client.clone())
            .configure(gateway::configure)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(bind_address)
        .context("Failed to bind intake gateway")?
        .run()
        .await
        .context("Intake gateway terminated")?;

    Ok(())
}
