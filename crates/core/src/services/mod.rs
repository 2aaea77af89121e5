//! Business logic services.

#![allow(missing_docs)]

pub mod like;
pub mod token;

pub use like::{LikeService, PostLikes};
pub use token::{CallerIdentity, Claims, TokenService, TokenType};
