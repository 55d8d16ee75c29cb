use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use regwatch_api::config::ServerConfig;
use regwatch_api::router::build_app_router;
use regwatch_api::state::AppState;
use regwatch_notify::{EmailConfig, NotificationDispatcher, PgRecipientDirectory, SmtpTransport};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regwatch_api=debug,regwatch_notify=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        home_jurisdiction = %config.home_jurisdiction,
        "Loaded server configuration",
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = regwatch_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    regwatch_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    regwatch_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Notification dispatcher ---
    let dispatcher = match EmailConfig::from_env() {
        Some(email_config) => {
            let transport =
                SmtpTransport::new(&email_config).expect("Failed to build SMTP transport");
            let directory = PgRecipientDirectory::new(pool.clone());
            tracing::info!(
                smtp_host = %email_config.smtp_host,
                concurrency = config.dispatch.concurrency,
                send_timeout_secs = config.dispatch.send_timeout.as_secs(),
                "Notification dispatcher configured",
            );
            if config.dispatch_may_outlast_request() {
                tracing::warn!(
                    send_timeout_secs = config.dispatch.send_timeout.as_secs(),
                    request_timeout_secs = config.request_timeout_secs,
                    "DISPATCH_SEND_TIMEOUT_SECS is not below REQUEST_TIMEOUT_SECS; a slow \
                     transport can time out publish responses",
                );
            }
            Some(Arc::new(NotificationDispatcher::new(
                Arc::new(transport),
                Arc::new(directory),
                config.dispatch.clone(),
            )))
        }
        None => {
            tracing::warn!("SMTP_HOST not set; alerts will publish without notification");
            None
        }
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        dispatcher,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
