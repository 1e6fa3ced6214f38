use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub use repo::Exercise;

pub fn router() -> Router<AppState> {
    handlers::exercise_routes()
}
