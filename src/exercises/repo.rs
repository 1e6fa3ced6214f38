use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Catalog exercise. Shared across users; not an owned resource.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Exercise {
    pub async fn create(
        db: &PgPool,
        name: &str,
        description: Option<&str>,
        category: Option<&str>,
    ) -> anyhow::Result<Exercise> {
        let exercise = sqlx::query_as::<_, Exercise>(
            r#"
            INSERT INTO exercises (name, description, category)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, category, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(category)
        .fetch_one(db)
        .await?;
        Ok(exercise)
    }

    /// Exact name match, case-insensitive.
    pub async fn find_by_name_ci(db: &PgPool, name: &str) -> anyhow::Result<Option<Exercise>> {
        let exercise = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT id, name, description, category, created_at, updated_at
            FROM exercises
            WHERE name ILIKE $1
            "#,
        )
        .bind(name)
        .fetch_optional(db)
        .await?;
        Ok(exercise)
    }

    pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Exercise>> {
        let exercise = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT id, name, description, category, created_at, updated_at
            FROM exercises
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(exercise)
    }

    pub async fn list(
        db: &PgPool,
        category: Option<&str>,
        search: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Exercise>> {
        let rows = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT id, name, description, category, created_at, updated_at
            FROM exercises
            WHERE ($1::text IS NULL OR category ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
            ORDER BY name
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(category)
        .bind(search)
        .bind(limit)
        .bind(skip)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn update(db: &PgPool, exercise: &Exercise) -> anyhow::Result<Option<Exercise>> {
        let exercise = sqlx::query_as::<_, Exercise>(
            r#"
            UPDATE exercises
            SET name = $2, description = $3, category = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, category, created_at, updated_at
            "#,
        )
        .bind(exercise.id)
        .bind(&exercise.name)
        .bind(&exercise.description)
        .bind(&exercise.category)
        .fetch_optional(db)
        .await?;
        Ok(exercise)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Exercises attached to a block, in block order. Ownership of the
    /// block is checked by the caller.
    pub async fn list_for_block(db: &PgPool, block_id: Uuid) -> anyhow::Result<Vec<Exercise>> {
        let rows = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT e.id, e.name, e.description, e.category, e.created_at, e.updated_at
            FROM exercises e
            JOIN training_block_exercises tbe ON tbe.exercise_id = e.id
            WHERE tbe.training_block_id = $1
            ORDER BY tbe.order_in_block
            "#,
        )
        .bind(block_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
