//! Authentication HTTP handlers
//!
//! Registration, login and refresh-token exchange.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth::AuthError;
use crate::error::ApiError;
use crate::models::{AuthTokensResponse, LoginRequest, RefreshTokenRequest, RegistrationRequest};
use crate::state::AppState;

/// POST /registration/ - Create an account and issue tokens
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthTokensResponse>), ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let tokens = state.auth_service.register(&req.email, &req.password).await?;

    Ok((StatusCode::CREATED, Json(tokens)))
}

/// POST /login/ - Check credentials and issue a fresh token pair
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthTokensResponse>, ApiError> {
    let Json(req) = payload?;

    let tokens = state
        .auth_service
        .login(req.email.as_deref(), req.password.as_deref())
        .await?;

    Ok(Json(tokens))
}

/// POST /refresh/ - Exchange a refresh token for a new pair
pub async fn refresh_token(
    State(state): State<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<Json<AuthTokensResponse>, ApiError> {
    let Json(req) = payload?;
    let refresh_token = req.refresh_token.ok_or(AuthError::InvalidRefreshToken)?;

    let tokens = state.auth_service.refresh_tokens(&refresh_token).await?;

    Ok(Json(tokens))
}
