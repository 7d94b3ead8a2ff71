//! # Axum Helpers
//!
//! Cross-cutting pieces shared by the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`errors`]**: `AppError` and the `{success, message, code, errors?}` envelope
//! - **[`extractors`]**: `ValidatedJson`
//! - **[`server`]**: router assembly, health/readiness helpers, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::server::ServerConfig;
//!
//! let config = ServerConfig::default();
//! let router = create_router::<ApiDoc>(api_routes, &config)?.merge(health_router());
//! create_production_app(router, &config, async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse, MessageResponse};
pub use extractors::ValidatedJson;
pub use server::{
    API_PREFIX, HealthCheckFuture, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks,
};
