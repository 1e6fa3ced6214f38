use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Errors surfaced at the handler boundary.
///
/// Authentication failures are deliberately opaque: a missing header, a
/// malformed token, a bad signature, an expired token and a token for a
/// vanished user all map to the same 401. "Not found" covers both absent
/// rows and rows owned by another user.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("Inactive user")]
    InactiveAccount,
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::InactiveAccount | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "internal server error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        match self {
            ApiError::Unauthorized(_) => {
                (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn parts(err: ApiError) -> (StatusCode, Option<String>, String) {
        let response = err.into_response();
        let status = response.status();
        let challenge = response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .map(|v| v.to_str().expect("header is ascii").to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, challenge, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn unauthorized_carries_bearer_challenge() {
        let (status, challenge, body) =
            parts(ApiError::Unauthorized("Could not validate credentials")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(challenge.as_deref(), Some("Bearer"));
        assert_eq!(body, "Could not validate credentials");
    }

    #[tokio::test]
    async fn inactive_account_is_bad_request() {
        let (status, challenge, body) = parts(ApiError::InactiveAccount).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(challenge.is_none());
        assert_eq!(body, "Inactive user");
    }

    #[tokio::test]
    async fn conflict_and_not_found_statuses() {
        let (status, _, body) = parts(ApiError::Conflict("Username already registered")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, "Username already registered");

        let (status, _, body) = parts(ApiError::NotFound("Training block not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Training block not found");
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let (status, _, body) =
            parts(ApiError::Internal(anyhow::anyhow!("db connection refused"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("db connection"));
    }
}
