use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Training block row. Owned: every query below carries the owner
/// predicate, so foreign rows are invisible.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TrainingBlock {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub color_hex: String,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TrainingBlock {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        description: Option<&str>,
        color_hex: &str,
    ) -> anyhow::Result<TrainingBlock> {
        let block = sqlx::query_as::<_, TrainingBlock>(
            r#"
            INSERT INTO training_blocks (title, description, color_hex, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, color_hex, user_id, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(color_hex)
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(block)
    }

    pub async fn list_by_owner(
        db: &PgPool,
        user_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<TrainingBlock>> {
        let rows = sqlx::query_as::<_, TrainingBlock>(
            r#"
            SELECT id, title, description, color_hex, user_id, created_at, updated_at
            FROM training_blocks
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<TrainingBlock>> {
        let block = sqlx::query_as::<_, TrainingBlock>(
            r#"
            SELECT id, title, description, color_hex, user_id, created_at, updated_at
            FROM training_blocks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(block)
    }

    /// Persists a merged row. Returns `None` when the row vanished or the
    /// owner does not match.
    pub async fn update(db: &PgPool, block: &TrainingBlock) -> anyhow::Result<Option<TrainingBlock>> {
        let block = sqlx::query_as::<_, TrainingBlock>(
            r#"
            UPDATE training_blocks
            SET title = $3, description = $4, color_hex = $5, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, title, description, color_hex, user_id, created_at, updated_at
            "#,
        )
        .bind(block.id)
        .bind(block.user_id)
        .bind(&block.title)
        .bind(&block.description)
        .bind(&block.color_hex)
        .fetch_optional(db)
        .await?;
        Ok(block)
    }

    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM training_blocks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
