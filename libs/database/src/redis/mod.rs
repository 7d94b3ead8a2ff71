//! Redis connection manager and health probe
//!
//! The cache is connected at startup and reported by readiness, but no
//! request path reads from or writes to it yet.

mod config;
mod connector;
mod health;

pub use config::RedisConfig;
pub use connector::{connect, connect_from_config_with_retry};
pub use health::check_health;

pub use redis::aio::ConnectionManager;
