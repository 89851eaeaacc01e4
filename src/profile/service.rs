use std::sync::Arc;

use uuid::Uuid;

use crate::error::ApiError;
use crate::profile::model::{CreateProfileRequest, Profile, ProfileRole, UpdateProfileRequest};
use crate::store::Store;

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn Store>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Profile, ApiError> {
        self.store
            .find_profile(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
    }

    /// Create the caller's profile, or return the existing one untouched.
    ///
    /// The flag is `true` when a new record was written.
    pub async fn create_profile(
        &self,
        user_id: Uuid,
        request: CreateProfileRequest,
    ) -> Result<(Profile, bool), ApiError> {
        if let Some(created) = self
            .store
            .insert_profile(request.into_new_profile(user_id))
            .await?
        {
            tracing::info!(user_id = %user_id, "Profile created");
            return Ok((created, true));
        }

        let existing = self.get_profile(user_id).await?;
        Ok((existing, false))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<Profile, ApiError> {
        self.store
            .update_profile(user_id, request.into())
            .await?
            .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
    }

    pub async fn set_role(&self, user_id: Uuid, role: ProfileRole) -> Result<Profile, ApiError> {
        let profile = self
            .store
            .set_profile_role(user_id, role)
            .await?
            .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

        tracing::info!(user_id = %user_id, role = %role, "Profile role changed");
        Ok(profile)
    }
}
