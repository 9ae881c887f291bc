//! Gateway routes

use crate::gateway::client::PredictionClient;
use crate::gateway::form::parse_form;
use crate::gateway::pages;
use crate::gateway::GatewayError;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use serde_json::json;
use std::collections::HashMap;
use tracing::{info, warn};

pub const CHECK_PATH: &str = "/checkheartdisease";

/// Register the gateway routes.
///
/// Expects `web::Data<PredictionClient>` to be registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(form_config()).service(
        web::resource(CHECK_PATH)
            .route(web::get().to(show_form))
            .route(web::post().to(submit_form))
            .default_service(web::to(method_not_allowed)),
    );
}

/// Form extractor settings: unreadable bodies become 400 JSON errors
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| {
            let error = GatewayError::MalformedForm(err.to_string());
            warn!(error = %error, "Rejected intake form");
            error.into()
        })
}

async fn show_form() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(pages::input_form(CHECK_PATH))
}

async fn submit_form(
    client: web::Data<PredictionClient>,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, GatewayError> {
    let features = parse_form(&form).map_err(|e| {
        warn!(error = %e, "Rejected intake form");
        e
    })?;

    let response = client.predict(&features).await?;
    info!(result = %response.result, "Prediction received");

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(pages::response_page(&response.result)))
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(json!({ "message": "Method Not Allowed" }))
}
