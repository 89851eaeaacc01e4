//! In-process store
//!
//! Mirrors the constraints of the SQL schema: unique email, one profile and
//! one requisites record per user, cascade on user deletion.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    NewProfile, NewRequisites, ProfileChanges, RequisitesChanges, Store, StoreError, UserChanges,
};
use crate::models::{Profile, ProfileRole, Requisites, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// Keyed by user id
    profiles: HashMap<Uuid, Profile>,
    /// Keyed by user id
    requisites: HashMap<Uuid, Requisites>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn require_user(&self, user_id: Uuid) -> Result<(), StoreError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(StoreError::Conflict(format!("user {} does not exist", user_id)))
        }
    }
}

/// Store that keeps all records in memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a user as staff. There is no HTTP surface for this; staff
    /// accounts are provisioned out of band.
    pub async fn set_staff(&self, user_id: Uuid, is_staff: bool) -> bool {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&user_id) {
            Some(user) => {
                user.is_staff = is_staff;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

fn apply(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn apply_opt(target: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *target = value;
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(email, None) {
            return Err(StoreError::Conflict(format!(
                "email {} is already registered",
                email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            is_staff: false,
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_refresh_hash(&self, hash: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.refresh_token_hash.as_deref() == Some(hash))
            .cloned())
    }

    async fn set_refresh_hash(&self, user_id: Uuid, hash: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.get_mut(&user_id) {
            user.refresh_token_hash = Some(hash.to_string());
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn clear_refresh_hash(&self, user_id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.get_mut(&user_id) {
            user.refresh_token_hash = None;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn swap_refresh_hash(
        &self,
        user_id: Uuid,
        current: &str,
        next: &str,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&user_id) {
            Some(user) if user.refresh_token_hash.as_deref() == Some(current) => {
                user.refresh_token_hash = Some(next.to_string());
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_user(
        &self,
        user_id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = changes.email.as_deref() {
            if tables.email_taken(email, Some(user_id)) {
                return Err(StoreError::Conflict(format!(
                    "email {} is already registered",
                    email
                )));
            }
        }

        let Some(user) = tables.users.get_mut(&user_id) else {
            return Ok(None);
        };
        apply(&mut user.email, changes.email);
        apply(&mut user.password_hash, changes.password_hash);
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let removed = tables.users.remove(&user_id).is_some();
        if removed {
            tables.profiles.remove(&user_id);
            tables.requisites.remove(&user_id);
        }
        Ok(removed)
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.tables.read().await.profiles.get(&user_id).cloned())
    }

    async fn insert_profile(&self, profile: NewProfile) -> Result<Option<Profile>, StoreError> {
        let mut tables = self.tables.write().await;
        tables.require_user(profile.user_id)?;
        if tables.profiles.contains_key(&profile.user_id) {
            return Ok(None);
        }

        let now = Utc::now();
        let created = Profile {
            id: Uuid::new_v4(),
            user_id: profile.user_id,
            role: ProfileRole::default(),
            avatar: profile.avatar,
            name: profile.name,
            phone: profile.phone,
            created_at: now,
            updated_at: now,
        };
        tables.profiles.insert(created.user_id, created.clone());
        Ok(Some(created))
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(profile) = tables.profiles.get_mut(&user_id) else {
            return Ok(None);
        };
        apply_opt(&mut profile.avatar, changes.avatar);
        apply(&mut profile.name, changes.name);
        apply_opt(&mut profile.phone, changes.phone);
        profile.updated_at = Utc::now();
        Ok(Some(profile.clone()))
    }

    async fn set_profile_role(
        &self,
        user_id: Uuid,
        role: ProfileRole,
    ) -> Result<Option<Profile>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(profile) = tables.profiles.get_mut(&user_id) else {
            return Ok(None);
        };
        profile.role = role;
        profile.updated_at = Utc::now();
        Ok(Some(profile.clone()))
    }

    async fn find_requisites(&self, user_id: Uuid) -> Result<Option<Requisites>, StoreError> {
        Ok(self.tables.read().await.requisites.get(&user_id).cloned())
    }

    async fn insert_requisites(
        &self,
        requisites: NewRequisites,
    ) -> Result<Option<Requisites>, StoreError> {
        let mut tables = self.tables.write().await;
        tables.require_user(requisites.user_id)?;
        if tables.requisites.contains_key(&requisites.user_id) {
            return Ok(None);
        }

        let now = Utc::now();
        let created = Requisites {
            id: Uuid::new_v4(),
            user_id: requisites.user_id,
            inn: requisites.inn,
            payment: requisites.payment,
            bank_name: requisites.bank_name,
            bik: requisites.bik,
            city: requisites.city,
            cor_payment: requisites.cor_payment,
            created_at: now,
            updated_at: now,
        };
        tables.requisites.insert(created.user_id, created.clone());
        Ok(Some(created))
    }

    async fn update_requisites(
        &self,
        user_id: Uuid,
        changes: RequisitesChanges,
    ) -> Result<Option<Requisites>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(requisites) = tables.requisites.get_mut(&user_id) else {
            return Ok(None);
        };
        apply(&mut requisites.inn, changes.inn);
        apply(&mut requisites.payment, changes.payment);
        apply(&mut requisites.bank_name, changes.bank_name);
        apply(&mut requisites.bik, changes.bik);
        apply(&mut requisites.city, changes.city);
        apply(&mut requisites.cor_payment, changes.cor_payment);
        requisites.updated_at = Utc::now();
        Ok(Some(requisites.clone()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
