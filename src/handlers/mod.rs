//! API handlers for the rmauth backend

pub mod auth;
pub mod health;
pub mod profile;
pub mod requisites;
pub mod user;

// Re-export extractors from middleware for handler use
pub use crate::middleware::auth::{AuthenticatedUser, OptionalUser, StaffUser};
