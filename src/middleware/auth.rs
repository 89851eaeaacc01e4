//! Authentication middleware
//!
//! Extractors that turn a bearer access token into explicit per-request
//! identity for handlers.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{verify_token, AuthError, AuthService, JwtError, ACCESS_TOKEN_TYPE};
use crate::error::ApiError;

/// Authenticated user extracted from the access token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub is_staff: bool,
}

/// Error response for authentication failures
#[derive(Debug, Serialize)]
struct AuthRejection {
    error: AuthRejectionDetails,
}

#[derive(Debug, Serialize)]
struct AuthRejectionDetails {
    code: String,
    message: String,
}

impl AuthRejection {
    fn new(code: &str, message: &str) -> Self {
        Self {
            error: AuthRejectionDetails {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

/// Extractor for authenticated users
///
/// Verifies the JWT from the Authorization header and loads the user, so
/// tokens of deleted accounts are rejected.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: AuthenticatedUser) -> impl IntoResponse {
///     format!("Hello, user {}", user.user_id)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AuthRejection::new(
                        "MISSING_TOKEN",
                        "Authorization header with Bearer token required",
                    )
                    .into_response()
                })?;

        let auth_service = Arc::<AuthService>::from_ref(state);

        let claims = verify_token(bearer.token(), auth_service.jwt_secret()).map_err(|e| {
            let (code, message) = match e {
                JwtError::TokenExpired => ("TOKEN_EXPIRED", "Token has expired"),
                _ => ("INVALID_TOKEN", "Invalid token"),
            };
            AuthRejection::new(code, message).into_response()
        })?;

        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(
                AuthRejection::new("INVALID_TOKEN_TYPE", "Expected access token").into_response(),
            );
        }

        let user_id = claims.user_id().map_err(|_| {
            AuthRejection::new("INVALID_TOKEN", "Invalid user ID in token").into_response()
        })?;

        let user = auth_service
            .get_user_by_id(user_id)
            .await
            .map_err(|e| match e {
                AuthError::UserNotFound => {
                    AuthRejection::new("USER_NOT_FOUND", "User no longer exists").into_response()
                }
                other => ApiError::from(other).into_response(),
            })?;

        Ok(AuthenticatedUser {
            user_id: user.id,
            email: user.email,
            is_staff: user.is_staff,
        })
    }
}

/// Optional authenticated user extractor
///
/// Attempts to authenticate but doesn't fail if no valid token is present.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthenticatedUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(OptionalUser(Some(user))),
            Err(_) => Ok(OptionalUser(None)),
        }
    }
}

/// Extractor that requires the staff flag
pub struct StaffUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for StaffUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !user.is_staff {
            return Err(ApiError::Forbidden("staff access required".to_string()).into_response());
        }

        Ok(StaffUser(user))
    }
}
