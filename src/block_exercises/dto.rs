use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::TrainingBlockExercise;
use crate::{error::ApiError, exercises::Exercise};

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub training_block_id: Uuid,
    pub exercise_id: Uuid,
    #[serde(default)]
    pub order_in_block: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLinkRequest {
    pub order_in_block: Option<i32>,
}

/// Link plus the full exercise, for block listings.
#[derive(Debug, Serialize)]
pub struct LinkWithExercise {
    pub id: Uuid,
    pub training_block_id: Uuid,
    pub exercise_id: Uuid,
    pub order_in_block: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub exercise: Exercise,
}

impl LinkWithExercise {
    pub fn new(link: TrainingBlockExercise, exercise: Exercise) -> Self {
        Self {
            id: link.id,
            training_block_id: link.training_block_id,
            exercise_id: link.exercise_id,
            order_in_block: link.order_in_block,
            created_at: link.created_at,
            updated_at: link.updated_at,
            exercise,
        }
    }
}

pub fn validate_order(order_in_block: i32) -> Result<(), ApiError> {
    if order_in_block < 0 {
        return Err(ApiError::Validation(
            "order_in_block must be zero or positive".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_defaults_to_zero() {
        let payload = r#"{
            "training_block_id": "11111111-1111-1111-1111-111111111111",
            "exercise_id": "22222222-2222-2222-2222-222222222222"
        }"#;
        let req: CreateLinkRequest = serde_json::from_str(payload).expect("deserialize");
        assert_eq!(req.order_in_block, 0);
    }

    #[test]
    fn negative_order_is_rejected() {
        assert!(validate_order(0).is_ok());
        assert!(validate_order(5).is_ok());
        assert!(validate_order(-1).is_err());
    }
}
