//! API endpoints.

mod likes;

use axum::{Router, middleware};

use crate::middleware::{AppState, auth_middleware};

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new().merge(likes::router())
}

/// Create the API router with authentication applied and state bound.
pub fn app(state: AppState) -> Router {
    router()
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
