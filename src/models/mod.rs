//! Data models for the rmauth backend

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod auth;
pub use auth::*;

/// User account
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
    /// SHA-256 digest of the single active refresh token
    #[serde(skip_serializing)]
    pub refresh_token_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_staff: user.is_staff,
        }
    }
}

/// Profile roles
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq, Default)]
#[sqlx(type_name = "profile_role")]
pub enum ProfileRole {
    #[default]
    Nothing,
    Renter,
    Owner,
    Developer,
}

impl ProfileRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileRole::Nothing => "Nothing",
            ProfileRole::Renter => "Renter",
            ProfileRole::Owner => "Owner",
            ProfileRole::Developer => "Developer",
        }
    }

    /// Whether this role may read requisites belonging to other users
    pub fn can_view_foreign_requisites(&self) -> bool {
        match self {
            ProfileRole::Developer => true,
            ProfileRole::Nothing | ProfileRole::Renter | ProfileRole::Owner => false,
        }
    }
}

impl std::fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User profile (one per user)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: ProfileRole,
    pub avatar: Option<String>,
    pub name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Banking requisites (one per user)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Requisites {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Taxpayer identification number
    pub inn: String,
    /// Payment (settlement) account
    pub payment: String,
    pub bank_name: String,
    /// Bank identification code
    pub bik: String,
    pub city: String,
    /// Correspondent account
    pub cor_payment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_developer_sees_foreign_requisites() {
        assert!(ProfileRole::Developer.can_view_foreign_requisites());
        assert!(!ProfileRole::Nothing.can_view_foreign_requisites());
        assert!(!ProfileRole::Renter.can_view_foreign_requisites());
        assert!(!ProfileRole::Owner.can_view_foreign_requisites());
    }

    #[test]
    fn test_role_default_and_wire_format() {
        assert_eq!(ProfileRole::default(), ProfileRole::Nothing);
        assert_eq!(
            serde_json::to_string(&ProfileRole::Developer).unwrap(),
            "\"Developer\""
        );
        let parsed: ProfileRole = serde_json::from_str("\"Renter\"").unwrap();
        assert_eq!(parsed, ProfileRole::Renter);
        assert!(serde_json::from_str::<ProfileRole>("\"developer\"").is_err());
    }

    #[test]
    fn test_user_serialization_hides_secrets() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "owner@example.com".to_string(),
            password_hash: "$2b$04$hash".to_string(),
            is_staff: false,
            refresh_token_hash: Some("abc".to_string()),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("refresh_token_hash").is_none());
        assert_eq!(json["email"], "owner@example.com");
    }
}
