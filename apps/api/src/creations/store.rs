use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::models::creation::{CreationRow, NewCreation};

/// Persistence for creations. Append and read only; rows are never updated or deleted.
#[async_trait]
pub trait CreationStore: Send + Sync {
    async fn insert(&self, creation: NewCreation) -> Result<CreationRow, sqlx::Error>;

    /// The caller's creations, newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<CreationRow>, sqlx::Error>;

    /// Creations flagged for the public gallery, newest first.
    async fn list_published(&self) -> Result<Vec<CreationRow>, sqlx::Error>;
}

#[derive(Clone)]
pub struct PgCreationStore {
    pool: PgPool,
}

impl PgCreationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CreationStore for PgCreationStore {
    async fn insert(&self, creation: NewCreation) -> Result<CreationRow, sqlx::Error> {
        let row: CreationRow = sqlx::query_as(
            r#"
            INSERT INTO creations (user_id, prompt, content, type, publish)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&creation.user_id)
        .bind(&creation.prompt)
        .bind(&creation.content)
        .bind(creation.kind.as_str())
        .bind(creation.publish)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Inserted {} creation {} for user {}",
            row.kind, row.id, row.user_id
        );
        Ok(row)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<CreationRow>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM creations WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn list_published(&self) -> Result<Vec<CreationRow>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM creations WHERE publish = TRUE ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }
}
