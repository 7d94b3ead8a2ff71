use axum::{Router, routing::get};

use crate::state::AppState;

pub mod health;
pub mod users;

/// API routes without the version prefix; `create_router` nests them
/// under `/api/v1`. Every sub-router already carries its state.
pub fn routes(state: &AppState) -> Router {
    mount(users::router(state))
}

fn mount(users: Router) -> Router {
    Router::new().nest("/users", users)
}

/// `GET /ready`, with state applied so it merges into the stateless app router.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
