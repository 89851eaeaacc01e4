use std::sync::Arc;

use uuid::Uuid;

use crate::error::ApiError;
use crate::models::ProfileRole;
use crate::requisites::model::{CreateRequisitesRequest, Requisites, UpdateRequisitesRequest};
use crate::store::Store;

/// Requisites are visible to their owner and to Developer profiles
pub fn may_view_requisites(
    requester_id: Uuid,
    requester_role: Option<ProfileRole>,
    owner_id: Uuid,
) -> bool {
    requester_id == owner_id
        || requester_role.is_some_and(|role| role.can_view_foreign_requisites())
}

#[derive(Clone)]
pub struct RequisitesService {
    store: Arc<dyn Store>,
}

impl RequisitesService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_requisites(&self, user_id: Uuid) -> Result<Requisites, ApiError> {
        self.store
            .find_requisites(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Requisites not found".to_string()))
    }

    /// Fetch another user's requisites on behalf of `requester`.
    ///
    /// Anonymous callers and callers without permission get `Forbidden`
    /// before existence of the target is revealed.
    pub async fn get_requisites_for(
        &self,
        requester: Option<Uuid>,
        owner_id: Uuid,
    ) -> Result<Requisites, ApiError> {
        let Some(requester_id) = requester else {
            return Err(ApiError::Forbidden("authentication required".to_string()));
        };

        let requester_role = self
            .store
            .find_profile(requester_id)
            .await?
            .map(|p| p.role);

        if !may_view_requisites(requester_id, requester_role, owner_id) {
            tracing::info!(
                requester_id = %requester_id,
                owner_id = %owner_id,
                "Requisites access denied"
            );
            return Err(ApiError::Forbidden(
                "developer role required".to_string(),
            ));
        }

        self.get_requisites(owner_id).await
    }

    /// Create the caller's requisites, or return the existing record untouched
    pub async fn create_requisites(
        &self,
        user_id: Uuid,
        request: CreateRequisitesRequest,
    ) -> Result<(Requisites, bool), ApiError> {
        if let Some(created) = self
            .store
            .insert_requisites(request.into_new_requisites(user_id))
            .await?
        {
            tracing::info!(user_id = %user_id, "Requisites created");
            return Ok((created, true));
        }

        let existing = self.get_requisites(user_id).await?;
        Ok((existing, false))
    }

    pub async fn update_requisites(
        &self,
        user_id: Uuid,
        request: UpdateRequisitesRequest,
    ) -> Result<Requisites, ApiError> {
        self.store
            .update_requisites(user_id, request.into())
            .await?
            .ok_or_else(|| ApiError::NotFound("Requisites not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_always_sees_own_requisites() {
        let owner = Uuid::new_v4();
        assert!(may_view_requisites(owner, None, owner));
        assert!(may_view_requisites(owner, Some(ProfileRole::Renter), owner));
    }

    #[test]
    fn test_foreign_requisites_need_developer() {
        let requester = Uuid::new_v4();
        let owner = Uuid::new_v4();

        assert!(may_view_requisites(
            requester,
            Some(ProfileRole::Developer),
            owner
        ));
        for role in [ProfileRole::Nothing, ProfileRole::Renter, ProfileRole::Owner] {
            assert!(!may_view_requisites(requester, Some(role), owner));
        }
        assert!(!may_view_requisites(requester, None, owner));
    }
}
