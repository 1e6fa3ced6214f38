use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::exercises::Exercise;

/// Link between a training block and a catalog exercise, with its
/// position in the block. Owned transitively through the block: every
/// query below joins on the block owner.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TrainingBlockExercise {
    pub id: Uuid,
    pub training_block_id: Uuid,
    pub exercise_id: Uuid,
    pub order_in_block: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct LinkWithExerciseRow {
    pub id: Uuid,
    pub training_block_id: Uuid,
    pub exercise_id: Uuid,
    pub order_in_block: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub e_id: Uuid,
    pub e_name: String,
    pub e_description: Option<String>,
    pub e_category: Option<String>,
    pub e_created_at: OffsetDateTime,
    pub e_updated_at: OffsetDateTime,
}

impl LinkWithExerciseRow {
    pub fn split(self) -> (TrainingBlockExercise, Exercise) {
        (
            TrainingBlockExercise {
                id: self.id,
                training_block_id: self.training_block_id,
                exercise_id: self.exercise_id,
                order_in_block: self.order_in_block,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            Exercise {
                id: self.e_id,
                name: self.e_name,
                description: self.e_description,
                category: self.e_category,
                created_at: self.e_created_at,
                updated_at: self.e_updated_at,
            },
        )
    }
}

impl TrainingBlockExercise {
    pub async fn create(
        db: &PgPool,
        training_block_id: Uuid,
        exercise_id: Uuid,
        order_in_block: i32,
    ) -> anyhow::Result<TrainingBlockExercise> {
        let link = sqlx::query_as::<_, TrainingBlockExercise>(
            r#"
            INSERT INTO training_block_exercises (training_block_id, exercise_id, order_in_block)
            VALUES ($1, $2, $3)
            RETURNING id, training_block_id, exercise_id, order_in_block, created_at, updated_at
            "#,
        )
        .bind(training_block_id)
        .bind(exercise_id)
        .bind(order_in_block)
        .fetch_one(db)
        .await?;
        Ok(link)
    }

    pub async fn pair_exists(
        db: &PgPool,
        training_block_id: Uuid,
        exercise_id: Uuid,
    ) -> anyhow::Result<bool> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM training_block_exercises
            WHERE training_block_id = $1 AND exercise_id = $2
            "#,
        )
        .bind(training_block_id)
        .bind(exercise_id)
        .fetch_optional(db)
        .await?;
        Ok(id.is_some())
    }

    pub async fn list_for_block_with_exercise(
        db: &PgPool,
        block_id: Uuid,
    ) -> anyhow::Result<Vec<(TrainingBlockExercise, Exercise)>> {
        let rows = sqlx::query_as::<_, LinkWithExerciseRow>(
            r#"
            SELECT l.id, l.training_block_id, l.exercise_id, l.order_in_block,
                   l.created_at, l.updated_at,
                   e.id AS e_id, e.name AS e_name, e.description AS e_description,
                   e.category AS e_category, e.created_at AS e_created_at,
                   e.updated_at AS e_updated_at
            FROM training_block_exercises l
            JOIN exercises e ON e.id = l.exercise_id
            WHERE l.training_block_id = $1
            ORDER BY l.order_in_block
            "#,
        )
        .bind(block_id)
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(LinkWithExerciseRow::split).collect())
    }

    pub async fn find_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<TrainingBlockExercise>> {
        let link = sqlx::query_as::<_, TrainingBlockExercise>(
            r#"
            SELECT l.id, l.training_block_id, l.exercise_id, l.order_in_block,
                   l.created_at, l.updated_at
            FROM training_block_exercises l
            JOIN training_blocks b ON b.id = l.training_block_id
            WHERE l.id = $1 AND b.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(link)
    }

    pub async fn update_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        order_in_block: i32,
    ) -> anyhow::Result<Option<TrainingBlockExercise>> {
        let link = sqlx::query_as::<_, TrainingBlockExercise>(
            r#"
            UPDATE training_block_exercises l
            SET order_in_block = $3, updated_at = now()
            FROM training_blocks b
            WHERE l.id = $1 AND b.id = l.training_block_id AND b.user_id = $2
            RETURNING l.id, l.training_block_id, l.exercise_id, l.order_in_block,
                      l.created_at, l.updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(order_in_block)
        .fetch_optional(db)
        .await?;
        Ok(link)
    }

    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM training_block_exercises l
            USING training_blocks b
            WHERE l.id = $1 AND b.id = l.training_block_id AND b.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
