use axum::{extract::State, response::IntoResponse};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

use crate::state::AppState;

/// Readiness probe against PostgreSQL and Redis
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "All dependencies reachable", body = serde_json::Value,
            example = json!({"status": "ready", "database": "connected", "cache": "connected"})),
        (status = 503, description = "At least one dependency unreachable", body = serde_json::Value,
            example = json!({"status": "not ready", "database": "connected", "cache": "disconnected"}))
    )
)]
pub async fn ready_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut cache = state.redis.clone();

    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "database",
            Box::pin(async {
                database::postgres::check_health(&state.db)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
        (
            "cache",
            Box::pin(async move {
                database::redis::check_health(&mut cache)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
    ];

    run_health_checks(checks).await
}
