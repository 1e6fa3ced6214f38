use axum::{
    extract::{FromRef, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{LoginForm, RegisterRequest, TokenResponse, UpdateProfile, UploadResponse, UserOut},
    extractors::CurrentUser,
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::User,
};
use crate::{error::ApiError, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/token", post(login))
        .route("/auth/me", get(get_me).put(update_me))
        .route("/auth/upload_profile_picture", post(upload_profile_picture))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.len() < 3 || username.len() > 100 {
        return Err(ApiError::Validation(
            "Username must be between 3 and 100 characters".into(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}

fn validate_picture_url(url: &str) -> Result<(), ApiError> {
    if !(url.starts_with("http://") || url.starts_with("https://") || url.starts_with('/')) {
        return Err(ApiError::Validation(
            "profile_picture_url must be an http(s) or local URL".into(),
        ));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserOut>), ApiError> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    validate_username(&payload.username)?;
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    validate_password(&payload.password)?;
    if let Some(url) = &payload.profile_picture_url {
        validate_picture_url(url)?;
    }

    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already registered");
        return Err(ApiError::Conflict("Username already registered"));
    }
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered"));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        &payload.username,
        &payload.email,
        &hash,
        payload.profile_picture_url.as_deref(),
    )
    .await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(UserOut::from(user))))
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    // Unknown user and wrong password are indistinguishable on the wire.
    let user = match User::find_by_username(&state.db, &form.username).await? {
        Some(user) if verify_password(&form.password, &user.password_hash) => user,
        _ => {
            warn!(username = %form.username, "login with invalid credentials");
            return Err(ApiError::Unauthorized("Incorrect username or password"));
        }
    };

    if !user.is_active {
        warn!(user_id = %user.id, "login attempt on inactive account");
        return Err(ApiError::InactiveAccount);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user.username)?;
    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip_all)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserOut> {
    Json(UserOut::from(user))
}

#[instrument(skip(state, user, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(mut user): CurrentUser,
    Json(mut payload): Json<UpdateProfile>,
) -> Result<Json<UserOut>, ApiError> {
    if let Some(username) = &mut payload.username {
        *username = username.trim().to_string();
        validate_username(username)?;
    }
    if let Some(email) = &mut payload.email {
        *email = email.trim().to_lowercase();
        if !is_valid_email(email) {
            return Err(ApiError::Validation("Invalid email".into()));
        }
    }
    if let Some(url) = &payload.profile_picture_url {
        validate_picture_url(url)?;
    }
    if let Some(password) = &payload.password {
        validate_password(password)?;
        user.password_hash = hash_password(password)?;
    }

    payload.apply(&mut user);
    let user = User::update(&state.db, &user).await?;
    info!(user_id = %user.id, "profile updated");
    Ok(Json(UserOut::from(user)))
}

#[instrument(skip(state, multipart))]
pub async fn upload_profile_picture(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(ApiError::Validation("File must be an image".into()));
        }

        let extension = field
            .file_name()
            .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_string()))
            .unwrap_or_else(|| "jpg".into());
        let filename = format!("{}.{}", Uuid::new_v4(), extension);

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let dir = std::path::Path::new(&state.config.upload_dir).join("profile_pics");
        tokio::fs::create_dir_all(&dir)
            .await
            .context("create upload directory")?;
        tokio::fs::write(dir.join(&filename), &data)
            .await
            .context("write profile picture")?;

        info!(%filename, size = data.len(), "profile picture uploaded");
        return Ok(Json(UploadResponse {
            url: format!("/static/profile_pics/{filename}"),
            filename,
        }));
    }

    Err(ApiError::Validation("file field is required".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn username_bounds() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"x".repeat(100)).is_ok());
        assert!(validate_username(&"x".repeat(101)).is_err());
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("12345").is_err());
    }

    #[test]
    fn picture_url_schemes() {
        assert!(validate_picture_url("https://example.com/me.png").is_ok());
        assert!(validate_picture_url("/static/profile_pics/x.jpg").is_ok());
        assert!(validate_picture_url("ftp://example.com/me.png").is_err());
    }
}
