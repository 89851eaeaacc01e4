use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use crate::models::{Profile, ProfileRole};
use crate::store::{NewProfile, ProfileChanges};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProfileRequest {
    /// Accepted for compatibility; the profile always belongs to the caller
    #[serde(default)]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub avatar: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

impl CreateProfileRequest {
    pub fn into_new_profile(self, user_id: Uuid) -> NewProfile {
        NewProfile {
            user_id,
            avatar: self.avatar,
            name: self.name,
            phone: self.phone,
        }
    }
}

/// Partial profile update. Absent fields are left as they are; present
/// fields are written even when empty.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 255))]
    pub avatar: Option<String>,
    #[validate(length(max = 50))]
    pub name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            avatar: req.avatar,
            name: req.name,
            phone: req.phone,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: ProfileRole,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub role: ProfileRole,
    pub avatar: Option<String>,
    pub name: String,
    pub phone: Option<String>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            user_id: profile.user_id,
            role: profile.role,
            avatar: profile.avatar,
            name: profile.name,
            phone: profile.phone,
        }
    }
}
