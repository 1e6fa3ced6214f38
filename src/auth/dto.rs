use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub profile_picture_url: Option<String>,
}

/// Form body for the token endpoint.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// Public part of the user returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct UserOut {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub profile_picture_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_active: user.is_active,
            profile_picture_url: user.profile_picture_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_picture_url: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateProfile {
    /// Merges the provided fields into the row. The password is not
    /// handled here: the handler hashes it before the merge.
    pub fn apply(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(url) = &self.profile_picture_url {
            user.profile_picture_url = Some(url.clone());
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
    }
}

/// Response of the profile picture upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".into(),
            is_active: true,
            profile_picture_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn user_out_never_contains_the_hash() {
        let user = sample_user();
        let json = serde_json::to_string(&UserOut::from(user)).expect("serialize");
        assert!(json.contains("alice@example.com"));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn token_response_is_bearer() {
        let json =
            serde_json::to_string(&TokenResponse::bearer("tok".into())).expect("serialize");
        assert!(json.contains(r#""token_type":"bearer""#));
        assert!(json.contains(r#""access_token":"tok""#));
    }

    #[test]
    fn apply_merges_only_provided_fields() {
        let mut user = sample_user();
        let original_email = user.email.clone();
        let update = UpdateProfile {
            username: Some("alice2".into()),
            email: None,
            password: None,
            profile_picture_url: None,
            is_active: Some(false),
        };
        update.apply(&mut user);
        assert_eq!(user.username, "alice2");
        assert_eq!(user.email, original_email);
        assert!(!user.is_active);
    }

    #[test]
    fn apply_never_touches_the_hash() {
        let mut user = sample_user();
        let original_hash = user.password_hash.clone();
        let update = UpdateProfile {
            username: None,
            email: None,
            password: Some("new-password".into()),
            profile_picture_url: Some("https://example.com/p.png".into()),
            is_active: None,
        };
        update.apply(&mut user);
        assert_eq!(user.password_hash, original_hash);
        assert_eq!(
            user.profile_picture_url.as_deref(),
            Some("https://example.com/p.png")
        );
    }

    #[test]
    fn register_request_has_no_owner_or_id_fields() {
        // Unknown fields in the payload are dropped by serde, so a caller
        // cannot smuggle an id or active flag into registration.
        let payload = r#"{
            "username": "mallory",
            "email": "m@example.com",
            "password": "secret1",
            "id": "11111111-1111-1111-1111-111111111111",
            "is_active": false
        }"#;
        let req: RegisterRequest = serde_json::from_str(payload).expect("deserialize");
        assert_eq!(req.username, "mallory");
        assert!(req.profile_picture_url.is_none());
    }
}
