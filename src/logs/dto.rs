use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo::ExerciseLog;
use crate::{
    auth::UserOut, blocks::repo::TrainingBlock, error::ApiError, exercises::Exercise,
    pagination::default_limit,
};

/// One performed set inside a log entry. Stored as-is in the JSONB
/// column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetEntry {
    pub set: i32,
    pub reps: i32,
    pub weight: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub rpe: Option<i32>,
    pub notes: Option<String>,
}

fn default_unit() -> String {
    "kg".into()
}

#[derive(Debug, Deserialize)]
pub struct CreateLogRequest {
    pub training_block_id: Uuid,
    pub exercise_id: Uuid,
    pub log_date: Option<Date>,
    pub sets_reps_data: Vec<SetEntry>,
    pub notes: Option<String>,
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateLogRequest {
    pub training_block_id: Option<Uuid>,
    pub exercise_id: Option<Uuid>,
    pub log_date: Option<Date>,
    pub sets_reps_data: Option<Vec<SetEntry>>,
    pub notes: Option<String>,
}

impl UpdateLogRequest {
    /// Merges the provided scalar fields. The set data is serialized by
    /// the handler before the merge.
    pub fn apply(&self, log: &mut ExerciseLog) {
        if let Some(block_id) = self.training_block_id {
            log.training_block_id = block_id;
        }
        if let Some(exercise_id) = self.exercise_id {
            log.exercise_id = exercise_id;
        }
        if let Some(log_date) = self.log_date {
            log.log_date = log_date;
        }
        if let Some(notes) = &self.notes {
            log.notes = Some(notes.clone());
        }
    }
}

/// Query parameters of the log listing.
#[derive(Debug, Deserialize)]
pub struct LogFilters {
    pub training_block_id: Option<Uuid>,
    pub exercise_id: Option<Uuid>,
    pub log_date: Option<Date>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// Log entry with the exercise, block and owner expanded.
#[derive(Debug, Serialize)]
pub struct LogDetails {
    pub id: Uuid,
    pub training_block_id: Uuid,
    pub exercise_id: Uuid,
    pub user_id: Uuid,
    pub log_date: Date,
    pub sets_reps_data: serde_json::Value,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub exercise: Exercise,
    pub training_block: TrainingBlock,
    pub user: UserOut,
}

impl LogDetails {
    pub fn new(log: ExerciseLog, exercise: Exercise, block: TrainingBlock, user: UserOut) -> Self {
        Self {
            id: log.id,
            training_block_id: log.training_block_id,
            exercise_id: log.exercise_id,
            user_id: log.user_id,
            log_date: log.log_date,
            sets_reps_data: log.sets_reps_data,
            notes: log.notes,
            created_at: log.created_at,
            updated_at: log.updated_at,
            exercise,
            training_block: block,
            user,
        }
    }
}

pub fn validate_sets(sets: &[SetEntry]) -> Result<(), ApiError> {
    for entry in sets {
        if let Some(rpe) = entry.rpe {
            if !(1..=10).contains(&rpe) {
                return Err(ApiError::Validation("rpe must be between 1 and 10".into()));
            }
        }
        if entry.reps < 0 || entry.set < 0 {
            return Err(ApiError::Validation(
                "set and reps must be zero or positive".into(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(rpe: Option<i32>) -> SetEntry {
        SetEntry {
            set: 1,
            reps: 5,
            weight: 100.0,
            unit: "kg".into(),
            rpe,
            notes: None,
        }
    }

    #[test]
    fn unit_defaults_to_kg() {
        let payload = r#"{"set": 1, "reps": 5, "weight": 100.0}"#;
        let set: SetEntry = serde_json::from_str(payload).expect("deserialize");
        assert_eq!(set.unit, "kg");
        assert!(set.rpe.is_none());
    }

    #[test]
    fn rpe_bounds() {
        assert!(validate_sets(&[entry(None)]).is_ok());
        assert!(validate_sets(&[entry(Some(1))]).is_ok());
        assert!(validate_sets(&[entry(Some(10))]).is_ok());
        assert!(validate_sets(&[entry(Some(0))]).is_err());
        assert!(validate_sets(&[entry(Some(11))]).is_err());
    }

    #[test]
    fn create_request_ignores_forged_owner() {
        let payload = r#"{
            "training_block_id": "11111111-1111-1111-1111-111111111111",
            "exercise_id": "22222222-2222-2222-2222-222222222222",
            "sets_reps_data": [{"set": 1, "reps": 8, "weight": 60.0}],
            "user_id": "33333333-3333-3333-3333-333333333333"
        }"#;
        let req: CreateLogRequest = serde_json::from_str(payload).expect("deserialize");
        assert_eq!(req.sets_reps_data.len(), 1);
        assert!(req.log_date.is_none());
    }

    #[test]
    fn update_merges_only_provided_fields() {
        use time::macros::date;

        let now = OffsetDateTime::now_utc();
        let original_block = Uuid::new_v4();
        let mut log = ExerciseLog {
            id: Uuid::new_v4(),
            training_block_id: original_block,
            exercise_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            log_date: date!(2025 - 01 - 15),
            sets_reps_data: serde_json::json!([]),
            notes: None,
            created_at: now,
            updated_at: now,
        };
        let update = UpdateLogRequest {
            training_block_id: None,
            exercise_id: None,
            log_date: Some(date!(2025 - 02 - 01)),
            sets_reps_data: None,
            notes: Some("felt heavy".into()),
        };
        update.apply(&mut log);
        assert_eq!(log.training_block_id, original_block);
        assert_eq!(log.log_date, date!(2025 - 02 - 01));
        assert_eq!(log.notes.as_deref(), Some("felt heavy"));
    }
}
