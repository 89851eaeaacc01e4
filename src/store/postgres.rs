//! PostgreSQL store backed by sqlx

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{
    NewProfile, NewRequisites, ProfileChanges, RequisitesChanges, Store, StoreError, UserChanges,
};
use crate::models::{Profile, ProfileRole, Requisites, User};

const USER_COLUMNS: &str =
    "id, email, password_hash, is_staff, refresh_token_hash, created_at, updated_at";
const PROFILE_COLUMNS: &str = "id, user_id, role, avatar, name, phone, created_at, updated_at";
const REQUISITES_COLUMNS: &str =
    "id, user_id, inn, payment, bank_name, bik, city, cor_payment, created_at, updated_at";

/// Store over a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    db_pool: PgPool,
}

impl PgStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Open a pool against `database_url`
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let db_pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await?;

        tracing::info!(max_connections, "Postgres pool ready");
        Ok(Self::new(db_pool))
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .map_err(|e| StoreError::Database(format!("migration failed: {}", e)))?;

        tracing::info!("Schema migrations applied");
        Ok(())
    }

    async fn find_user_where(
        &self,
        predicate: &str,
        value: &str,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {predicate} = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO users (id, email, password_hash, is_staff, created_at, updated_at)
            VALUES ($1, $2, $3, FALSE, NOW(), NOW())
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.db_pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_user_where("email", email).await
    }

    async fn find_user_by_refresh_hash(&self, hash: &str) -> Result<Option<User>, StoreError> {
        self.find_user_where("refresh_token_hash", hash).await
    }

    async fn set_refresh_hash(&self, user_id: Uuid, hash: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(hash)
        .bind(user_id)
        .execute(&self.db_pool)
        .await?;
        Ok(())
    }

    async fn clear_refresh_hash(&self, user_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.db_pool)
        .await?;
        Ok(())
    }

    async fn swap_refresh_hash(
        &self,
        user_id: Uuid,
        current: &str,
        next: &str,
    ) -> Result<bool, StoreError> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $1, updated_at = NOW()
            WHERE id = $2 AND refresh_token_hash = $3
            "#,
        )
        .bind(next)
        .bind(user_id)
        .bind(current)
        .execute(&self.db_pool)
        .await?
        .rows_affected();

        Ok(rows_affected == 1)
    }

    async fn update_user(
        &self,
        user_id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(changes.email)
            .bind(changes.password_hash)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        // profiles and requisites go with it via ON DELETE CASCADE
        let rows_affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db_pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1");
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(profile)
    }

    async fn insert_profile(&self, profile: NewProfile) -> Result<Option<Profile>, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO profiles (id, user_id, role, avatar, name, phone, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            ON CONFLICT (user_id) DO NOTHING
            RETURNING {PROFILE_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Profile>(&sql)
            .bind(Uuid::new_v4())
            .bind(profile.user_id)
            .bind(ProfileRole::default())
            .bind(profile.avatar)
            .bind(profile.name)
            .bind(profile.phone)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(created)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, StoreError> {
        let sql = format!(
            r#"
            UPDATE profiles
            SET avatar = COALESCE($2, avatar),
                name = COALESCE($3, name),
                phone = COALESCE($4, phone),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        );
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .bind(changes.avatar)
            .bind(changes.name)
            .bind(changes.phone)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(profile)
    }

    async fn set_profile_role(
        &self,
        user_id: Uuid,
        role: ProfileRole,
    ) -> Result<Option<Profile>, StoreError> {
        let sql = format!(
            r#"
            UPDATE profiles
            SET role = $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        );
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .bind(role)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(profile)
    }

    async fn find_requisites(&self, user_id: Uuid) -> Result<Option<Requisites>, StoreError> {
        let sql = format!("SELECT {REQUISITES_COLUMNS} FROM requisites WHERE user_id = $1");
        let requisites = sqlx::query_as::<_, Requisites>(&sql)
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(requisites)
    }

    async fn insert_requisites(
        &self,
        requisites: NewRequisites,
    ) -> Result<Option<Requisites>, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO requisites (
                id, user_id, inn, payment, bank_name, bik, city, cor_payment,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            ON CONFLICT (user_id) DO NOTHING
            RETURNING {REQUISITES_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Requisites>(&sql)
            .bind(Uuid::new_v4())
            .bind(requisites.user_id)
            .bind(requisites.inn)
            .bind(requisites.payment)
            .bind(requisites.bank_name)
            .bind(requisites.bik)
            .bind(requisites.city)
            .bind(requisites.cor_payment)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(created)
    }

    async fn update_requisites(
        &self,
        user_id: Uuid,
        changes: RequisitesChanges,
    ) -> Result<Option<Requisites>, StoreError> {
        let sql = format!(
            r#"
            UPDATE requisites
            SET inn = COALESCE($2, inn),
                payment = COALESCE($3, payment),
                bank_name = COALESCE($4, bank_name),
                bik = COALESCE($5, bik),
                city = COALESCE($6, city),
                cor_payment = COALESCE($7, cor_payment),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {REQUISITES_COLUMNS}
            "#
        );
        let requisites = sqlx::query_as::<_, Requisites>(&sql)
            .bind(user_id)
            .bind(changes.inn)
            .bind(changes.payment)
            .bind(changes.bank_name)
            .bind(changes.bik)
            .bind(changes.city)
            .bind(changes.cor_payment)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(requisites)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}
