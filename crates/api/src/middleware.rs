//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use likeboard_core::{LikeService, TokenService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub like_service: LikeService,
    pub token_service: TokenService,
}

/// Authentication middleware.
///
/// Verifies a bearer access token and stores the caller identity in the
/// request extensions. Requests without a valid token pass through
/// unauthenticated; handlers that need a caller reject them.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.token_service.verify_access(token.trim()) {
            Ok(caller) => {
                req.extensions_mut().insert(caller);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid bearer token");
            }
        }
    }

    next.run(req).await
}
