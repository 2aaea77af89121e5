//! Repositories.
//!
//! Every method that may run inside a transaction takes the connection to
//! use, so callers can pass either the pool or an open transaction.

pub mod like;
pub mod post;

pub use like::LikeRepository;
pub use post::PostRepository;
