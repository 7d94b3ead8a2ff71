//! Shared application state.

/// Cloned into each stateful router; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Opened and health-checked, not used by any endpoint yet
    pub redis: database::redis::ConnectionManager,
}
