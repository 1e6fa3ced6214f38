use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use super::repo::TrainingBlock;
use crate::error::ApiError;

pub const DEFAULT_COLOR: &str = "#FFFFFF";

/// Body for creating a training block. There is no owner field: the
/// owner is always the authenticated user.
#[derive(Debug, Deserialize)]
pub struct CreateBlockRequest {
    pub title: String,
    pub description: Option<String>,
    pub color_hex: Option<String>,
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateBlockRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color_hex: Option<String>,
}

impl UpdateBlockRequest {
    pub fn apply(&self, block: &mut TrainingBlock) {
        if let Some(title) = &self.title {
            block.title = title.clone();
        }
        if let Some(description) = &self.description {
            block.description = Some(description.clone());
        }
        if let Some(color_hex) = &self.color_hex {
            block.color_hex = color_hex.clone();
        }
    }
}

pub fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.is_empty() || title.len() > 255 {
        return Err(ApiError::Validation(
            "Title must be between 1 and 255 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_color_hex(color: &str) -> Result<(), ApiError> {
    lazy_static! {
        static ref COLOR_RE: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
    }
    if !COLOR_RE.is_match(color) {
        return Err(ApiError::Validation(
            "color_hex must match #RRGGBB".into(),
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
    fn color_hex_pattern() {
        assert!(validate_color_hex("#FFFFFF").is_ok());
        assert!(validate_color_hex("#00ff7f").is_ok());
        assert!(validate_color_hex("FFFFFF").is_err());
        assert!(validate_color_hex("#FFF").is_err());
        assert!(validate_color_hex("#GGGGGG").is_err());
        assert!(validate_color_hex("#FFFFFF0").is_err());
    }

    #[test]
    fn create_request_ignores_forged_owner() {
        // A smuggled user_id is dropped at deserialization; the column is
        // always bound to the authenticated user by the handler.
        let payload = r#"{
            "title": "Hypertrophy A",
            "user_id": "11111111-1111-1111-1111-111111111111"
        }"#;
        let req: CreateBlockRequest = serde_json::from_str(payload).expect("deserialize");
        assert_eq!(req.title, "Hypertrophy A");
    }

    #[test]
    fn update_merges_only_provided_fields() {
        let now = OffsetDateTime::now_utc();
        let mut block = TrainingBlock {
            id: Uuid::new_v4(),
            title: "Old title".into(),
            description: Some("old".into()),
            color_hex: "#FFFFFF".into(),
            user_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        let update = UpdateBlockRequest {
            title: None,
            description: None,
            color_hex: Some("#123ABC".into()),
        };
        update.apply(&mut block);
        assert_eq!(block.title, "Old title");
        assert_eq!(block.description.as_deref(), Some("old"));
        assert_eq!(block.color_hex, "#123ABC");
    }
}
