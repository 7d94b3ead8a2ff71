use crate::{env_or_default, env_parse_or_default, ConfigError, FromEnv};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated allowed origins, or `*` for any origin
    pub cors_allowed_origin: String,
    /// Upper bound for connection cleanup once a shutdown signal arrives
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            ..Self::default()
        }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with defaults:
    /// - HOST: 0.0.0.0
    /// - SERVER_PORT: 3000
    /// - CORS_ALLOWED_ORIGIN: *
    /// - SHUTDOWN_TIMEOUT_SECS: 15
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse_or_default("SERVER_PORT", "3000")?;
        let cors_allowed_origin = env_or_default("CORS_ALLOWED_ORIGIN", "*");
        let shutdown_timeout_secs: u64 = env_parse_or_default("SHUTDOWN_TIMEOUT_SECS", "15")?;

        Ok(Self {
            host,
            port,
            cors_allowed_origin,
            shutdown_timeout: Duration::from_secs(shutdown_timeout_secs),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 3000,
            cors_allowed_origin: "*".to_string(),
            shutdown_timeout: Duration::from_secs(15),
        }
    }
}
