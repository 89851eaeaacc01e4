//! Account handlers for the authenticated user

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::AuthenticatedUser;
use crate::models::{UpdateUserRequest, UserResponse};
use crate::state::AppState;

/// GET /user/
pub async fn get_current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.auth_service.get_user_by_id(user.user_id).await?;

    Ok(Json(user.into()))
}

/// PUT /user/ - Partial update of email and/or password
pub async fn update_current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state.auth_service.update_user(user.user_id, req).await?;

    Ok(Json(user.into()))
}

/// DELETE /user/ - Remove the account, its profile and requisites
pub async fn delete_current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<StatusCode, ApiError> {
    state.auth_service.delete_user(user.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
