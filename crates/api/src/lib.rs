//! HTTP API layer for likeboard.
//!
//! This crate provides the REST API for liking posts:
//!
//! - **Endpoints**: like, unlike, and list likes of a post
//! - **Extractors**: Authenticated caller identity
//! - **Middleware**: Bearer JWT authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::{app, router};
pub use middleware::AppState;
