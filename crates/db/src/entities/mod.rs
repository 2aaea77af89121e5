//! Database entities.

#![allow(missing_docs)]

pub mod like;
pub mod post;
pub mod user;

pub use like::Entity as Like;
pub use post::Entity as Post;
pub use user::Entity as User;
