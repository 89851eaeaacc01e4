//! Authentication routes

use axum::{routing::post, Router};

use crate::handlers::auth;
use crate::state::AppState;

/// Registration, login and token refresh; none require a bearer token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/registration/", post(auth::register))
        .route("/login/", post(auth::login))
        .route("/refresh/", post(auth::refresh_token))
}
