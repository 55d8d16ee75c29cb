#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use regwatch_api::auth::jwt::{Claims, JwtConfig};
use regwatch_api::config::ServerConfig;
use regwatch_api::router::build_app_router;
use regwatch_api::state::AppState;
use regwatch_core::roles::{ROLE_ADMIN, ROLE_ANALYST, ROLE_CLIENT};
use regwatch_core::types::DbId;
use regwatch_db::models::organization::{CreateContact, CreateOrganization};
use regwatch_db::repositories::OrganizationRepo;
use regwatch_notify::{
    DispatchConfig, NotificationDispatcher, OutboundMessage, PgRecipientDirectory,
    MessageTransport, TransportError,
};
use sqlx::PgPool;
use tower::ServiceExt;

pub const ANALYST_ID: DbId = 1;
pub const ADMIN_ID: DbId = 2;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        home_jurisdiction: "DE".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
        },
        dispatch: DispatchConfig::default(),
    }
}

/// Application without a message transport.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(pool, None)
}

/// Application whose dispatcher delivers through `transport` and resolves
/// recipients from `organization_contacts`.
pub fn build_test_app_with_transport(pool: PgPool, transport: Arc<RecordingTransport>) -> Router {
    let dispatcher = NotificationDispatcher::new(
        transport,
        Arc::new(PgRecipientDirectory::new(pool.clone())),
        DispatchConfig::default(),
    );
    build_app(pool, Some(Arc::new(dispatcher)))
}

fn build_app(pool: PgPool, dispatcher: Option<Arc<NotificationDispatcher>>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        dispatcher,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

pub fn analyst_token() -> String {
    token(ANALYST_ID, ROLE_ANALYST, None)
}

pub fn admin_token() -> String {
    token(ADMIN_ID, ROLE_ADMIN, None)
}

pub fn client_token(user_id: DbId, organization_id: DbId) -> String {
    token(user_id, ROLE_CLIENT, Some(organization_id))
}

/// Sign a 15-minute token the way the identity service does.
fn token(user_id: DbId, role: &str, org_id: Option<DbId>) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        org_id,
        exp: now + 15 * 60,
        iat: now,
        jti: uuid::Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(test_config().jwt.secret.as_bytes()),
    )
    .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create an organization with the given alert recipients.
pub async fn seed_organization(pool: &PgPool, name: &str, recipients: &[&str]) -> DbId {
    let org = OrganizationRepo::create(pool, &CreateOrganization { name: name.into() })
        .await
        .unwrap();
    for email in recipients {
        OrganizationRepo::create_contact(
            pool,
            &CreateContact {
                organization_id: org.id,
                name: format!("Contact {email}"),
                email: (*email).to_string(),
                receives_alerts: true,
            },
        )
        .await
        .unwrap();
    }
    org.id
}

/// Fields that satisfy the publication requirements.
pub fn publishable_fields() -> serde_json::Value {
    serde_json::json!({
        "category": "AML",
        "legal_basis": "GwG §10",
        "summary": "New due diligence duties for obliged entities.",
        "deadline": "2026-12-31",
    })
}

/// Create a draft through the API and return its id.
pub async fn create_draft(app: Router, title: &str) -> DbId {
    let response = post_json(
        app,
        "/api/v1/alerts",
        serde_json::json!({ "title": title }),
        &analyst_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Message transport double
// ---------------------------------------------------------------------------

/// Records every message; addresses in `failing` are rejected.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<OutboundMessage>>,
    pub failing: Mutex<HashSet<String>>,
}

impl RecordingTransport {
    pub fn failing_for(addresses: &[&str]) -> Self {
        let transport = Self::default();
        transport
            .failing
            .lock()
            .unwrap()
            .extend(addresses.iter().map(|a| a.to_string()));
        transport
    }

    pub fn sent_to(&self) -> Vec<String> {
        let mut to: Vec<String> = self
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.to_email.clone())
            .collect();
        to.sort();
        to
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        if self.failing.lock().unwrap().contains(&message.to_email) {
            return Err(TransportError::Rejected(format!(
                "mailbox unavailable: {}",
                message.to_email
            )));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send_json(app, Method::POST, uri, body, token).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send_json(app, Method::PUT, uri, body, token).await
}

pub async fn post_empty(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}
