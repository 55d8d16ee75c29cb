use std::time::Duration;

use regwatch_notify::DispatchConfig;

use crate::auth::jwt::JwtConfig;

/// Default jurisdiction stamped on new alerts.
const DEFAULT_HOME_JURISDICTION: &str = "DE";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    ///
    /// Publish and Dispatch/Resend await the whole dispatch before
    /// answering, so this also bounds how long a slow transport can hold
    /// those responses. See [`ServerConfig::dispatch_may_outlast_request`].
    pub request_timeout_secs: u64,
    /// Jurisdiction applied to alerts created without one (default: `DE`).
    pub home_jurisdiction: String,
    /// JWT validation configuration.
    pub jwt: JwtConfig,
    /// Notification dispatcher tuning.
    pub dispatch: DispatchConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `HOME_JURISDICTION`    | `DE`                       |
    ///
    /// JWT and dispatch settings are read by [`JwtConfig::from_env`] and
    /// [`DispatchConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let home_jurisdiction = std::env::var("HOME_JURISDICTION")
            .ok()
            .map(|j| j.trim().to_string())
            .filter(|j| !j.is_empty())
            .unwrap_or_else(|| DEFAULT_HOME_JURISDICTION.to_string());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            home_jurisdiction,
            jwt: JwtConfig::from_env(),
            dispatch: DispatchConfig::from_env(),
        }
    }

    /// Whether a single send may run past the HTTP request timeout.
    ///
    /// Sends run `DISPATCH_CONCURRENCY` at a time, so a dispatch takes
    /// roughly `ceil(recipients / concurrency) * send_timeout` in the worst
    /// case. When even one send can outlast `REQUEST_TIMEOUT_SECS`, the
    /// request times out with 408 while the publication itself has already
    /// committed.
    pub fn dispatch_may_outlast_request(&self) -> bool {
        self.dispatch.send_timeout >= Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(request_timeout_secs: u64, send_timeout_secs: u64) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: Vec::new(),
            request_timeout_secs,
            home_jurisdiction: DEFAULT_HOME_JURISDICTION.into(),
            jwt: JwtConfig {
                secret: "secret".into(),
            },
            dispatch: DispatchConfig {
                concurrency: 8,
                send_timeout: Duration::from_secs(send_timeout_secs),
            },
        }
    }

    #[test]
    fn send_timeout_at_or_above_request_timeout_is_flagged() {
        assert!(config(30, 30).dispatch_may_outlast_request());
        assert!(config(10, 30).dispatch_may_outlast_request());
        assert!(!config(60, 20).dispatch_may_outlast_request());
    }
}
