//! Data Transfer Objects for REST request serialization.
//!
//! Responses serialize [`crate::domain::User`] directly.

pub mod user_dto;

pub use user_dto::*;
