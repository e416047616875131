use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::Result;

/// A requestable/fulfillable item record. Needs are created and owned by the
/// needs side of the platform; this service only reads them and appends
/// references.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Need {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait NeedStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Need>>;
}

#[derive(Clone)]
pub struct PgNeedStore {
    db: PgPool,
}

impl PgNeedStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NeedStore for PgNeedStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Need>> {
        let need = sqlx::query_as::<_, Need>(
            r#"
            SELECT id, user_id, title, description, created_at
            FROM needs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(need)
    }
}
