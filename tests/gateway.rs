//! Intake gateway tests against a live prediction service

mod common;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpServer};
use common::{fixture_path, counted_engine};
use heart_disease_predictor::api::{self, PREDICT_PATH};
use heart_disease_predictor::gateway::{self, routes::CHECK_PATH, PredictionClient};
use heart_disease_predictor::UnknownFeaturePolicy;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

/// Run the prediction service on an ephemeral port and return its URL
fn spawn_prediction_api(model_path: PathBuf) -> (String, ServerHandle) {
    let (engine, _counter) = counted_engine(model_path, UnknownFeaturePolicy::Ignore);
    let engine = web::Data::new(engine);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(engine.clone())
            .configure(api::configure)
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    (format!("http://{}{}", addr, PREDICT_PATH), handle)
}

fn client(url: &str) -> web::Data<PredictionClient> {
    web::Data::new(PredictionClient::new(url, Duration::from_secs(5)).unwrap())
}

fn form_fields(oldpeak: &str, exercise_angina: &str, st_slope: &str) -> Vec<(&'static str, String)> {
    vec![
        ("age", "54".to_string()),
        ("sex", "1".to_string()),
        ("chestpain", "0".to_string()),
        ("cholesterol", "246".to_string()),
        ("fastingbs", "0".to_string()),
        ("maxhr", "150".to_string()),
        ("exerciseangina", exercise_angina.to_string()),
        ("oldpeak", oldpeak.to_string()),
        ("stslope", st_slope.to_string()),
    ]
}

#[actix_web::test]
async fn test_form_page_is_served() {
    let app = test::init_service(
        App::new()
            .app_data(client("http://127.0.0.1:1/heart_disease_predictor/"))
            .configure(gateway::configure),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri(CHECK_PATH).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let page = std::str::from_utf8(&body).unwrap();
    assert!(page.contains("<form"));
    assert!(page.contains("name=\"oldpeak\""));
}

#[actix_web::test]
async fn test_submission_is_relayed_to_prediction_api() {
    let (url, handle) = spawn_prediction_api(fixture_path(common::LOGISTIC_FIXTURE));
    let app = test::init_service(
        App::new()
            .app_data(client(&url))
            .configure(gateway::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(CHECK_PATH)
        .set_form(form_fields("2.0", "1", "0"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("<p id=\"result\">True</p>"));

    let req = test::TestRequest::post()
        .uri(CHECK_PATH)
        .set_form(form_fields("0.0", "0", "1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("<p id=\"result\">False</p>"));

    handle.stop(false).await;
}

#[actix_web::test]
async fn test_unreachable_prediction_api_is_a_server_error() {
    let app = test::init_service(
        App::new()
            .app_data(client("http://127.0.0.1:1/heart_disease_predictor/"))
            .configure(gateway::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(CHECK_PATH)
        .set_form(form_fields("2.0", "1", "0"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Prediction API failed");
}

#[actix_web::test]
async fn test_prediction_api_error_is_a_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let (url, handle) = spawn_prediction_api(dir.path().join("absent.onnx"));
    let app = test::init_service(
        App::new()
            .app_data(client(&url))
            .configure(gateway::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(CHECK_PATH)
        .set_form(form_fields("2.0", "1", "0"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    handle.stop(false).await;
}

#[actix_web::test]
async fn test_invalid_field_is_rejected_without_relaying() {
    let app = test::init_service(
        App::new()
            .app_data(client("http://127.0.0.1:1/heart_disease_predictor/"))
            .configure(gateway::configure),
    )
    .await;

    let mut fields = form_fields("2.0", "1", "0");
    fields[0].1 = "fifty".to_string();

    let req = test::TestRequest::post()
        .uri(CHECK_PATH)
        .set_form(fields)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["field"], "age");
    assert!(!body["message"].as_str().unwrap().contains("fifty"));
}

#[actix_web::test]
async fn test_non_form_body_is_a_json_client_error() {
    let app = test::init_service(
        App::new()
            .app_data(client("http://127.0.0.1:1/heart_disease_predictor/"))
            .configure(gateway::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(CHECK_PATH)
        .set_json(serde_json::json!({"age": 54}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().starts_with("malformed form"));
    assert!(body.get("field").is_none());
}

#[actix_web::test]
async fn test_other_methods_are_not_allowed() {
    let app = test::init_service(
        App::new()
            .app_data(client("http://127.0.0.1:1/heart_disease_predictor/"))
            .configure(gateway::configure),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::put().uri(CHECK_PATH).to_request()).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Method Not Allowed");
}
