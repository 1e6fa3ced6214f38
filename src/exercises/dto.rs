use serde::Deserialize;

use super::repo::Exercise;
use crate::{error::ApiError, pagination::default_limit};

#[derive(Debug, Deserialize)]
pub struct CreateExerciseRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateExerciseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl UpdateExerciseRequest {
    pub fn apply(&self, exercise: &mut Exercise) {
        if let Some(name) = &self.name {
            exercise.name = name.clone();
        }
        if let Some(description) = &self.description {
            exercise.description = Some(description.clone());
        }
        if let Some(category) = &self.category {
            exercise.category = Some(category.clone());
        }
    }
}

/// Query parameters of the catalog listing.
#[derive(Debug, Deserialize)]
pub struct ExerciseFilters {
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.is_empty() || name.len() > 255 {
        return Err(ApiError::Validation(
            "Name must be between 1 and 255 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_category(category: &str) -> Result<(), ApiError> {
    if category.len() > 100 {
        return Err(ApiError::Validation(
            "Category must be at most 100 characters".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[test]
    fn filters_default_to_unfiltered_first_page() {
        let f: ExerciseFilters = serde_json::from_str("{}").expect("empty object");
        assert!(f.category.is_none());
        assert!(f.search.is_none());
        assert_eq!(f.skip, 0);
        assert_eq!(f.limit, 100);
    }

    #[test]
    fn update_merges_only_provided_fields() {
        let now = OffsetDateTime::now_utc();
        let mut exercise = Exercise {
            id: Uuid::new_v4(),
            name: "Back squat".into(),
            description: None,
            category: Some("legs".into()),
            created_at: now,
            updated_at: now,
        };
        let update = UpdateExerciseRequest {
            name: None,
            description: Some("High-bar".into()),
            category: None,
        };
        update.apply(&mut exercise);
        assert_eq!(exercise.name, "Back squat");
        assert_eq!(exercise.description.as_deref(), Some("High-bar"));
        assert_eq!(exercise.category.as_deref(), Some("legs"));
    }

    #[test]
    fn name_bounds() {
        assert!(validate_name("Deadlift").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(256)).is_err());
    }
}
