//! Server configuration

use std::time::Duration;

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
    /// Apply pending schema migrations at startup
    pub run_migrations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout: 30,
            run_migrations: true,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SERVER_HOST`: Bind address (default: 0.0.0.0)
    /// - `SERVER_PORT`: Bind port (default: 8080)
    /// - `REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
    /// - `RUN_MIGRATIONS`: Apply migrations at startup (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("SERVER_HOST").unwrap_or(defaults.host);

        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let request_timeout = std::env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.request_timeout);

        let run_migrations = std::env::var("RUN_MIGRATIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.run_migrations);

        Self {
            host,
            port,
            request_timeout,
            run_migrations,
        }
    }

    /// `host:port`, resolved when the listener binds
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}
