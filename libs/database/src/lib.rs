//! Connection plumbing for the relational store and the cache.
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL pool through SeaORM, migrations runner
//! - `redis` (default) - Redis `ConnectionManager`
//! - `config` - `core_config::FromEnv` implementations for both configs
//!
//! # Example
//!
//! ```ignore
//! use database::{postgres, redis};
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(pg_config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "temfy_api").await?;
//!
//! let cache = redis::connect_from_config_with_retry(redis_config, None).await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "redis")]
pub mod redis;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
