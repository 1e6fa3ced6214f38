use axum::Router;

use crate::state::AppState;

mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;

pub use dto::UserOut;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
