use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::needs::repo::Need;

pub const ROLE_USER: &str = "USER";

/// How the account was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "auth_provider", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Local,
    Google,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub name: String,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub image_url: Option<String>,
    pub is_helper: bool,
    pub provider: AuthProvider,
    pub roles: Vec<String>,
    #[serde(skip_serializing)]
    pub reset_token: Option<String>, // single active value, cleared on use
    pub version: i64,
    pub created_at: OffsetDateTime,
}

/// Fields required to create a user; everything else is defaulted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub image_url: String,
    pub is_helper: bool,
    pub provider: AuthProvider,
    pub roles: Vec<String>,
}

/// Persisted user records plus the saved-need association list, which lives
/// on the user side of the relationship.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>>;

    /// Insert a new user. Email uniqueness is decided here, by the store's
    /// unique index, not by any pre-check.
    async fn insert(&self, new: NewUser) -> Result<User>;

    /// Version-checked whole-record save. Fails with `ConcurrentUpdate` when
    /// the record changed under the caller, and with `EmailTaken` when the
    /// new email collides.
    async fn update(&self, user: &User) -> Result<User>;

    /// Append to the saved-need list. Deliberately not deduplicated.
    async fn append_saved_need(&self, user_id: Uuid, need_id: Uuid) -> Result<()>;
    async fn saved_needs(&self, user_id: Uuid) -> Result<Vec<Need>>;
    async fn owned_needs(&self, user_id: Uuid) -> Result<Vec<Need>>;
}

const USER_COLUMNS: &str = "id, email, password_hash, name, bio, phone_number, image_url, \
                            is_helper, provider, roles, reset_token, version, created_at";

fn email_conflict(e: sqlx::Error, email: &str) -> AppError {
    if e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        AppError::EmailTaken(email.to_string())
    } else {
        AppError::Database(e)
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE reset_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, new: NewUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, password_hash, name, image_url, is_helper, provider, roles) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.name)
        .bind(&new.image_url)
        .bind(new.is_helper)
        .bind(new.provider)
        .bind(&new.roles)
        .fetch_one(&self.db)
        .await
        .map_err(|e| email_conflict(e, &new.email))?;
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User> {
        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET email = $3, password_hash = $4, name = $5, bio = $6, phone_number = $7, \
                 image_url = $8, is_helper = $9, provider = $10, roles = $11, \
                 reset_token = $12, version = version + 1 \
             WHERE id = $1 AND version = $2 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(user.version)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.bio)
        .bind(&user.phone_number)
        .bind(&user.image_url)
        .bind(user.is_helper)
        .bind(user.provider)
        .bind(&user.roles)
        .bind(&user.reset_token)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| email_conflict(e, &user.email))?;
        updated.ok_or(AppError::ConcurrentUpdate)
    }

    async fn append_saved_need(&self, user_id: Uuid, need_id: Uuid) -> Result<()> {
        sqlx::query("INSERT INTO saved_needs (user_id, need_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(need_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn saved_needs(&self, user_id: Uuid) -> Result<Vec<Need>> {
        let needs = sqlx::query_as::<_, Need>(
            r#"
            SELECT n.id, n.user_id, n.title, n.description, n.created_at
            FROM saved_needs s
            JOIN needs n ON n.id = s.need_id
            WHERE s.user_id = $1
            ORDER BY s.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(needs)
    }

    async fn owned_needs(&self, user_id: Uuid) -> Result<Vec<Need>> {
        let needs = sqlx::query_as::<_, Need>(
            r#"
            SELECT id, user_id, title, description, created_at
            FROM needs
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(needs)
    }
}
