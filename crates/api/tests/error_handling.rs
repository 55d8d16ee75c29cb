//! Tests for `AppError` to HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is involved.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use regwatch_api::error::AppError;
use regwatch_core::error::CoreError;
use regwatch_notify::{DirectoryError, DispatchError};

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "RegulatoryAlert",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "RegulatoryAlert with id 42 not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Title is required".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Title is required");
}

#[tokio::test]
async fn invalid_transition_returns_409() {
    let err = AppError::Core(CoreError::InvalidTransition {
        from: "resolved".into(),
        to: "dismissed".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_TRANSITION");
    assert_eq!(
        json["error"],
        "Invalid status transition from 'resolved' to 'dismissed'"
    );
}

#[tokio::test]
async fn not_draft_returns_409() {
    let err = AppError::Core(CoreError::NotDraft {
        id: 7,
        status: "new".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "NOT_DRAFT");
}

#[tokio::test]
async fn pool_timeout_returns_503() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::PoolTimedOut)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "STORE_UNAVAILABLE");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn directory_failure_returns_503_without_details() {
    let err = AppError::Dispatch(DispatchError::Directory {
        organization_id: 3,
        source: DirectoryError::Unavailable("ldap down at 10.0.0.5".into()),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "RECIPIENTS_UNAVAILABLE");
    assert!(!json["error"].as_str().unwrap().contains("10.0.0.5"));
}

#[tokio::test]
async fn dispatch_unavailable_returns_503() {
    let (status, json) = error_to_response(AppError::DispatchUnavailable).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "DISPATCH_UNAVAILABLE");
}

#[tokio::test]
async fn internal_error_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_matches!(json["error"].as_str(), Some(msg) if !msg.contains("secret"));
}
