use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{jwt::JwtKeys, repo::User};
use crate::{error::ApiError, state::AppState};

/// The authenticated user for the current request.
///
/// Resolved on every protected request: one token validation, one user
/// lookup, no caching. A token whose subject no longer exists rejects
/// exactly like an invalid token.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized("Could not validate credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Could not validate credentials"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Unauthorized("Could not validate credentials")
        })?;

        match User::find_by_username(&state.db, &claims.sub).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => {
                warn!(subject = %claims.sub, "token subject does not resolve to a user");
                Err(ApiError::Unauthorized("Could not validate credentials"))
            }
            Err(e) => Err(ApiError::Internal(e)),
        }
    }
}
