//! rmauth backend library
//!
//! Account registration and login, access/refresh token rotation, and
//! profile and banking requisites records behind a JSON HTTP API.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod profile;
pub mod requisites;
pub mod routes;
pub mod state;
pub mod store;
