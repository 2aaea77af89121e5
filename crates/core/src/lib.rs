//! Core business logic for likeboard.

pub mod services;

pub use services::*;
