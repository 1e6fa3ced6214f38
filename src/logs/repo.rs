use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{blocks::repo::TrainingBlock, exercises::Exercise};

/// One logged session of an exercise inside a training block. Owned:
/// every query below carries the owner predicate.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExerciseLog {
    pub id: Uuid,
    pub training_block_id: Uuid,
    pub exercise_id: Uuid,
    pub user_id: Uuid,
    pub log_date: Date,
    pub sets_reps_data: serde_json::Value,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Optional filters of the log listing; all owner-scoped.
#[derive(Debug, Default)]
pub struct LogQuery {
    pub training_block_id: Option<Uuid>,
    pub exercise_id: Option<Uuid>,
    pub log_date: Option<Date>,
}

#[derive(Debug, FromRow)]
pub struct LogDetailsRow {
    pub id: Uuid,
    pub training_block_id: Uuid,
    pub exercise_id: Uuid,
    pub user_id: Uuid,
    pub log_date: Date,
    pub sets_reps_data: serde_json::Value,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub e_id: Uuid,
    pub e_name: String,
    pub e_description: Option<String>,
    pub e_category: Option<String>,
    pub e_created_at: OffsetDateTime,
    pub e_updated_at: OffsetDateTime,
    pub b_id: Uuid,
    pub b_title: String,
    pub b_description: Option<String>,
    pub b_color_hex: String,
    pub b_user_id: Uuid,
    pub b_created_at: OffsetDateTime,
    pub b_updated_at: OffsetDateTime,
}

impl LogDetailsRow {
    pub fn split(self) -> (ExerciseLog, Exercise, TrainingBlock) {
        (
            ExerciseLog {
                id: self.id,
                training_block_id: self.training_block_id,
                exercise_id: self.exercise_id,
                user_id: self.user_id,
                log_date: self.log_date,
                sets_reps_data: self.sets_reps_data,
                notes: self.notes,
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
            TrainingBlock {
                id: self.b_id,
                title: self.b_title,
                description: self.b_description,
                color_hex: self.b_color_hex,
                user_id: self.b_user_id,
                created_at: self.b_created_at,
                updated_at: self.b_updated_at,
            },
        )
    }
}

const DETAILS_SELECT: &str = r#"
    SELECT l.id, l.training_block_id, l.exercise_id, l.user_id, l.log_date,
           l.sets_reps_data, l.notes, l.created_at, l.updated_at,
           e.id AS e_id, e.name AS e_name, e.description AS e_description,
           e.category AS e_category, e.created_at AS e_created_at,
           e.updated_at AS e_updated_at,
           b.id AS b_id, b.title AS b_title, b.description AS b_description,
           b.color_hex AS b_color_hex, b.user_id AS b_user_id,
           b.created_at AS b_created_at, b.updated_at AS b_updated_at
    FROM exercise_logs l
    JOIN exercises e ON e.id = l.exercise_id
    JOIN training_blocks b ON b.id = l.training_block_id
"#;

impl ExerciseLog {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        training_block_id: Uuid,
        exercise_id: Uuid,
        log_date: Date,
        sets_reps_data: &serde_json::Value,
        notes: Option<&str>,
    ) -> anyhow::Result<ExerciseLog> {
        let log = sqlx::query_as::<_, ExerciseLog>(
            r#"
            INSERT INTO exercise_logs
                (training_block_id, exercise_id, user_id, log_date, sets_reps_data, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, training_block_id, exercise_id, user_id, log_date,
                      sets_reps_data, notes, created_at, updated_at
            "#,
        )
        .bind(training_block_id)
        .bind(exercise_id)
        .bind(user_id)
        .bind(log_date)
        .bind(sets_reps_data)
        .bind(notes)
        .fetch_one(db)
        .await?;
        Ok(log)
    }

    /// Newest first: log date, then creation time.
    pub async fn list_with_details(
        db: &PgPool,
        user_id: Uuid,
        query: &LogQuery,
        skip: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<(ExerciseLog, Exercise, TrainingBlock)>> {
        let sql = format!(
            r#"{DETAILS_SELECT}
            WHERE l.user_id = $1
              AND ($2::uuid IS NULL OR l.training_block_id = $2)
              AND ($3::uuid IS NULL OR l.exercise_id = $3)
              AND ($4::date IS NULL OR l.log_date = $4)
            ORDER BY l.log_date DESC, l.created_at DESC
            LIMIT $5 OFFSET $6
            "#
        );
        let rows = sqlx::query_as::<_, LogDetailsRow>(&sql)
            .bind(user_id)
            .bind(query.training_block_id)
            .bind(query.exercise_id)
            .bind(query.log_date)
            .bind(limit)
            .bind(skip)
            .fetch_all(db)
            .await?;
        Ok(rows.into_iter().map(LogDetailsRow::split).collect())
    }

    pub async fn find_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<ExerciseLog>> {
        let log = sqlx::query_as::<_, ExerciseLog>(
            r#"
            SELECT id, training_block_id, exercise_id, user_id, log_date,
                   sets_reps_data, notes, created_at, updated_at
            FROM exercise_logs
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(log)
    }

    pub async fn find_owned_with_details(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<(ExerciseLog, Exercise, TrainingBlock)>> {
        let sql = format!("{DETAILS_SELECT} WHERE l.id = $1 AND l.user_id = $2");
        let row = sqlx::query_as::<_, LogDetailsRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(db)
            .await?;
        Ok(row.map(LogDetailsRow::split))
    }

    /// Persists a merged row. Returns `None` when the row vanished or the
    /// owner does not match.
    pub async fn update(db: &PgPool, log: &ExerciseLog) -> anyhow::Result<Option<ExerciseLog>> {
        let log = sqlx::query_as::<_, ExerciseLog>(
            r#"
            UPDATE exercise_logs
            SET training_block_id = $3, exercise_id = $4, log_date = $5,
                sets_reps_data = $6, notes = $7, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, training_block_id, exercise_id, user_id, log_date,
                      sets_reps_data, notes, created_at, updated_at
            "#,
        )
        .bind(log.id)
        .bind(log.user_id)
        .bind(log.training_block_id)
        .bind(log.exercise_id)
        .bind(log.log_date)
        .bind(&log.sets_reps_data)
        .bind(&log.notes)
        .fetch_optional(db)
        .await?;
        Ok(log)
    }

    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM exercise_logs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
