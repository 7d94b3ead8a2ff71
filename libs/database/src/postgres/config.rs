use sea_orm::ConnectOptions;
use std::time::Duration;
use tracing::log::LevelFilter;

#[cfg(feature = "config")]
use core_config::{env_or_default, env_parse_or_default, ConfigError, FromEnv};

/// PostgreSQL connection and pool settings.
///
/// Either built by hand with [`PostgresConfig::new`] or, with the `config`
/// feature, loaded through `FromEnv`.
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub sqlx_logging: bool,
    pub sqlx_logging_level: LevelFilter,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Assemble a `postgres://` URL from its parts, percent-encoding the credentials.
    pub fn url_from_parts(host: &str, port: u16, user: &str, password: &str, name: &str) -> String {
        let user = urlencoding::encode(user);
        if password.is_empty() {
            format!("postgres://{user}@{host}:{port}/{name}")
        } else {
            let password = urlencoding::encode(password);
            format!("postgres://{user}:{password}@{host}:{port}/{name}")
        }
    }

    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url);
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(self.sqlx_logging_level);
        opt
    }

    /// URL with the password replaced, safe for logs
    pub fn redacted_url(&self) -> String {
        match (self.url.find("://"), self.url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                let userinfo = &self.url[scheme_end + 3..at];
                let user = userinfo.split(':').next().unwrap_or_default();
                format!("{}{}:***{}", &self.url[..scheme_end + 3], user, &self.url[at..])
            }
            _ => self.url.clone(),
        }
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 100,
            min_connections: 10,
            connect_timeout: Duration::from_secs(8),
            acquire_timeout: Duration::from_secs(8),
            idle_timeout: Duration::from_secs(300),
            sqlx_logging: true,
            sqlx_logging_level: LevelFilter::Debug,
        }
    }
}

/// Environment variables:
/// - `DATABASE_URL` - full connection string; wins over the parts below
/// - `DB_HOST` (localhost), `DB_PORT` (5432), `DB_USER` (postgres),
///   `DB_PASSWORD` (empty), `DB_NAME` (nextship)
/// - `DB_MAX_CONNECTIONS` (100), `DB_MIN_CONNECTIONS` (10)
#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = match std::env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => url,
            _ => {
                let host = env_or_default("DB_HOST", "localhost");
                let port: u16 = env_parse_or_default("DB_PORT", "5432")?;
                let user = env_or_default("DB_USER", "postgres");
                let password = env_or_default("DB_PASSWORD", "");
                let name = env_or_default("DB_NAME", "nextship");
                Self::url_from_parts(&host, port, &user, &password, &name)
            }
        };

        let max_connections: u32 = env_parse_or_default("DB_MAX_CONNECTIONS", "100")?;
        let min_connections: u32 = env_parse_or_default("DB_MIN_CONNECTIONS", "10")?;
        if min_connections > max_connections {
            return Err(ConfigError::ParseError {
                key: "DB_MIN_CONNECTIONS".to_string(),
                details: format!("{min_connections} exceeds DB_MAX_CONNECTIONS ({max_connections})"),
            });
        }

        Ok(Self {
            url,
            max_connections,
            min_connections,
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_from_parts_encodes_credentials() {
        let url = PostgresConfig::url_from_parts("db", 5433, "app", "p@ss/word", "users");
        assert_eq!(url, "postgres://app:p%40ss%2Fword@db:5433/users");
    }

    #[test]
    fn test_url_from_parts_without_password() {
        let url = PostgresConfig::url_from_parts("localhost", 5432, "postgres", "", "nextship");
        assert_eq!(url, "postgres://postgres@localhost:5432/nextship");
    }

    #[test]
    fn test_redacted_url_hides_password() {
        let config = PostgresConfig::new("postgres://app:secret@db:5432/users");
        assert_eq!(config.redacted_url(), "postgres://app:***@db:5432/users");
        assert!(!config.redacted_url().contains("secret"));
    }

    #[test]
    fn test_defaults() {
        let config = PostgresConfig::new("postgres://localhost/test");
        assert_eq!(config.max_connections, 100);
        assert_eq!(config.min_connections, 10);
    }

    #[cfg(feature = "config")]
    mod from_env {
        use super::*;

        const VARS: [&str; 8] = [
            "DATABASE_URL",
            "DB_HOST",
            "DB_PORT",
            "DB_USER",
            "DB_PASSWORD",
            "DB_NAME",
            "DB_MAX_CONNECTIONS",
            "DB_MIN_CONNECTIONS",
        ];

        #[test]
        fn test_built_from_defaults() {
            temp_env::with_vars_unset(VARS, || {
                let config = PostgresConfig::from_env().unwrap();
                assert_eq!(config.url, "postgres://postgres@localhost:5432/nextship");
                assert_eq!(config.max_connections, 100);
                assert_eq!(config.min_connections, 10);
            });
        }

        #[test]
        fn test_database_url_wins_over_parts() {
            temp_env::with_vars(
                [
                    ("DATABASE_URL", Some("postgres://u:p@elsewhere:6543/other")),
                    ("DB_HOST", Some("ignored")),
                    ("DB_MAX_CONNECTIONS", Some("20")),
                    ("DB_MIN_CONNECTIONS", Some("2")),
                ],
                || {
                    let config = PostgresConfig::from_env().unwrap();
                    assert_eq!(config.url, "postgres://u:p@elsewhere:6543/other");
                    assert_eq!(config.max_connections, 20);
                    assert_eq!(config.min_connections, 2);
                },
            );
        }

        #[test]
        fn test_min_above_max_is_rejected() {
            temp_env::with_vars(
                [
                    ("DB_MAX_CONNECTIONS", Some("5")),
                    ("DB_MIN_CONNECTIONS", Some("10")),
                ],
                || {
                    let err = PostgresConfig::from_env().unwrap_err();
                    assert!(err.to_string().contains("DB_MIN_CONNECTIONS"));
                },
            );
        }

        #[test]
        fn test_invalid_port() {
            temp_env::with_vars(
                [("DATABASE_URL", None), ("DB_PORT", Some("not-a-port"))],
                || {
                    let err = PostgresConfig::from_env().unwrap_err();
                    assert!(err.to_string().contains("DB_PORT"));
                },
            );
        }
    }
}
