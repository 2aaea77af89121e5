//! Request extractors.

use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use likeboard_common::AppError;
use likeboard_core::CallerIdentity;

/// Authenticated caller extractor.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub CallerIdentity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by auth middleware
        parts
            .extensions
            .get::<CallerIdentity>()
            .copied()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Path parameters; parse failures use the API error body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string; parse failures use the API error body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
