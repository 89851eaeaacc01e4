//! Banking requisites handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::{AuthenticatedUser, OptionalUser};
use crate::requisites::{CreateRequisitesRequest, RequisitesResponse, UpdateRequisitesRequest};
use crate::state::AppState;

/// GET /requisites/
pub async fn get_own_requisites(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<RequisitesResponse>, ApiError> {
    let requisites = state
        .requisites_service
        .get_requisites(user.user_id)
        .await?;
    Ok(Json(requisites.into()))
}

/// POST /requisites/ - Partial update of banking fields
pub async fn update_own_requisites(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<UpdateRequisitesRequest>, JsonRejection>,
) -> Result<Json<RequisitesResponse>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let requisites = state
        .requisites_service
        .update_requisites(user.user_id, req)
        .await?;
    Ok(Json(requisites.into()))
}

/// GET /requisites/:user_id/ - Owner or Developer only, bare 403 otherwise
pub async fn get_requisites_by_user(
    State(state): State<AppState>,
    OptionalUser(requester): OptionalUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<RequisitesResponse>, ApiError> {
    let requisites = state
        .requisites_service
        .get_requisites_for(requester.map(|u| u.user_id), user_id)
        .await?;
    Ok(Json(requisites.into()))
}

/// POST /createrequisites/ - 201 when created, 200 with the existing record otherwise
pub async fn create_requisites(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateRequisitesRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RequisitesResponse>), ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let (requisites, created) = state
        .requisites_service
        .create_requisites(user.user_id, req)
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(requisites.into())))
}
