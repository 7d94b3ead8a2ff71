#[cfg(feature = "config")]
use core_config::{env_or_default, env_parse_or_default, ConfigError, FromEnv};

/// Redis connection settings
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub database: u8,
}

impl RedisConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            password: None,
            database: 0,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_database(mut self, database: u8) -> Self {
        self.database = database;
        self
    }

    /// `redis://[:password@]host:port/db`
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                urlencoding::encode(password),
                self.host,
                self.port,
                self.database
            ),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.database),
        }
    }

    /// Host, port and database, without credentials
    pub fn address(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self::new("localhost", 6379)
    }
}

/// Environment variables:
/// - `REDIS_HOST` (localhost), `REDIS_PORT` (6379)
/// - `REDIS_PASSWORD` (empty means no auth), `REDIS_DB` (0)
#[cfg(feature = "config")]
impl FromEnv for RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("REDIS_HOST", "localhost");
        let port = env_parse_or_default("REDIS_PORT", "6379")?;
        let database = env_parse_or_default("REDIS_DB", "0")?;
        let password = Some(env_or_default("REDIS_PASSWORD", "")).filter(|p| !p.is_empty());

        Ok(Self {
            host,
            port,
            password,
            database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_without_password() {
        let config = RedisConfig::default();
        assert_eq!(config.url(), "redis://localhost:6379/0");
    }

    #[test]
    fn test_url_with_password_and_database() {
        let config = RedisConfig::new("cache", 6380)
            .with_password("s3cr#t")
            .with_database(2);
        assert_eq!(config.url(), "redis://:s3cr%23t@cache:6380/2");
        assert_eq!(config.address(), "cache:6380/2");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars_unset(["REDIS_HOST", "REDIS_PORT", "REDIS_PASSWORD", "REDIS_DB"], || {
            let config = RedisConfig::from_env().unwrap();
            assert_eq!(config.url(), "redis://localhost:6379/0");
            assert!(config.password.is_none());
        });
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_custom() {
        temp_env::with_vars(
            [
                ("REDIS_HOST", Some("redis.internal")),
                ("REDIS_PORT", Some("6390")),
                ("REDIS_PASSWORD", Some("pw")),
                ("REDIS_DB", Some("3")),
            ],
            || {
                let config = RedisConfig::from_env().unwrap();
                assert_eq!(config.url(), "redis://:pw@redis.internal:6390/3");
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_invalid_db() {
        temp_env::with_var("REDIS_DB", Some("sixteen"), || {
            let err = RedisConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("REDIS_DB"));
        });
    }
}
