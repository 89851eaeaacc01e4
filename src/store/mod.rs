//! Record storage for users, profiles and requisites
//!
//! Services talk to storage only through the [`Store`] trait. [`PgStore`]
//! is the production backend; [`MemoryStore`] keeps everything in process
//! and backs local development and the test suite.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Profile, ProfileRole, Requisites, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Unique or foreign key constraint violated
    #[error("Constraint violation: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() =>
            {
                StoreError::Conflict(db_err.message().to_string())
            }
            _ => StoreError::Database(e.to_string()),
        }
    }
}

/// Changes to a user row; `None` leaves the column untouched
#[derive(Debug, Default, Clone)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Values for a new profile
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub user_id: Uuid,
    pub avatar: Option<String>,
    pub name: String,
    pub phone: Option<String>,
}

/// Partial profile update; `None` leaves the column untouched
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub avatar: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Values for a new requisites record
#[derive(Debug, Clone)]
pub struct NewRequisites {
    pub user_id: Uuid,
    pub inn: String,
    pub payment: String,
    pub bank_name: String,
    pub bik: String,
    pub city: String,
    pub cor_payment: String,
}

/// Partial requisites update; `None` leaves the column untouched
#[derive(Debug, Default, Clone)]
pub struct RequisitesChanges {
    pub inn: Option<String>,
    pub payment: Option<String>,
    pub bank_name: Option<String>,
    pub bik: Option<String>,
    pub city: Option<String>,
    pub cor_payment: Option<String>,
}

/// Single-record lookups and updates over the relational schema
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a new user. Fails with [`StoreError::Conflict`] if the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Exact match on the stored refresh token digest
    async fn find_user_by_refresh_hash(&self, hash: &str) -> Result<Option<User>, StoreError>;

    /// Overwrite the stored refresh token digest unconditionally
    async fn set_refresh_hash(&self, user_id: Uuid, hash: &str) -> Result<(), StoreError>;

    /// Drop the stored digest so no refresh token matches
    async fn clear_refresh_hash(&self, user_id: Uuid) -> Result<(), StoreError>;

    /// Replace the digest only if it still equals `current`.
    ///
    /// Returns `false` when another exchange got there first.
    async fn swap_refresh_hash(
        &self,
        user_id: Uuid,
        current: &str,
        next: &str,
    ) -> Result<bool, StoreError>;

    async fn update_user(
        &self,
        user_id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError>;

    /// Delete a user together with its profile and requisites
    async fn delete_user(&self, user_id: Uuid) -> Result<bool, StoreError>;

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Insert a profile unless the user already has one (`Ok(None)` then)
    async fn insert_profile(&self, profile: NewProfile) -> Result<Option<Profile>, StoreError>;

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, StoreError>;

    async fn set_profile_role(
        &self,
        user_id: Uuid,
        role: ProfileRole,
    ) -> Result<Option<Profile>, StoreError>;

    async fn find_requisites(&self, user_id: Uuid) -> Result<Option<Requisites>, StoreError>;

    /// Insert requisites unless the user already has them (`Ok(None)` then)
    async fn insert_requisites(
        &self,
        requisites: NewRequisites,
    ) -> Result<Option<Requisites>, StoreError>;

    async fn update_requisites(
        &self,
        user_id: Uuid,
        changes: RequisitesChanges,
    ) -> Result<Option<Requisites>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
