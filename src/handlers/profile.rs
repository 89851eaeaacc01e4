//! Profile handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::{AuthenticatedUser, StaffUser};
use crate::profile::{CreateProfileRequest, ProfileResponse, SetRoleRequest, UpdateProfileRequest};
use crate::state::AppState;

/// GET /profile/
pub async fn get_own_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.profile_service.get_profile(user.user_id).await?;
    Ok(Json(profile.into()))
}

/// POST /profile/ - Partial update of avatar, name and phone
pub async fn update_own_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let profile = state
        .profile_service
        .update_profile(user.user_id, req)
        .await?;
    Ok(Json(profile.into()))
}

/// GET /profile/:user_id/ - Public profile lookup
pub async fn get_profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.profile_service.get_profile(user_id).await?;
    Ok(Json(profile.into()))
}

/// POST /createprofile/ - 201 when created, 200 with the existing profile otherwise
pub async fn create_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateProfileRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let (profile, created) = state
        .profile_service
        .create_profile(user.user_id, req)
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(profile.into())))
}

/// POST /profile/:user_id/role/ - Staff only
pub async fn set_profile_role(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(user_id): Path<Uuid>,
    payload: Result<Json<SetRoleRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let Json(req) = payload?;

    tracing::info!(staff_id = %staff.user_id, user_id = %user_id, "Staff role assignment");
    let profile = state.profile_service.set_role(user_id, req.role).await?;
    Ok(Json(profile.into()))
}
