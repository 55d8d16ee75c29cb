//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_reports_db_and_dispatch(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["dispatch_configured"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/alerts").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/alerts", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
