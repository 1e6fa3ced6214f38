use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{validate_color_hex, validate_title, CreateBlockRequest, UpdateBlockRequest, DEFAULT_COLOR},
    repo::TrainingBlock,
};
use crate::{
    auth::extractors::CurrentUser, error::ApiError, pagination::Pagination, state::AppState,
};

pub fn block_routes() -> Router<AppState> {
    Router::new()
        .route("/training_blocks", post(create_block).get(list_blocks))
        .route(
            "/training_blocks/:id",
            get(get_block).put(update_block).delete(delete_block),
        )
}

#[instrument(skip(state, user, payload))]
pub async fn create_block(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateBlockRequest>,
) -> Result<(StatusCode, Json<TrainingBlock>), ApiError> {
    validate_title(&payload.title)?;
    let color = payload.color_hex.as_deref().unwrap_or(DEFAULT_COLOR);
    validate_color_hex(color)?;

    let block = TrainingBlock::create(
        &state.db,
        user.id,
        &payload.title,
        payload.description.as_deref(),
        color,
    )
    .await?;
    info!(block_id = %block.id, user_id = %user.id, "training block created");
    Ok((StatusCode::CREATED, Json(block)))
}

#[instrument(skip(state, user))]
pub async fn list_blocks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<TrainingBlock>>, ApiError> {
    let blocks = TrainingBlock::list_by_owner(&state.db, user.id, p.skip, p.limit).await?;
    Ok(Json(blocks))
}

#[instrument(skip(state, user))]
pub async fn get_block(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TrainingBlock>, ApiError> {
    let block = TrainingBlock::find_owned(&state.db, user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Training block not found"))?;
    Ok(Json(block))
}

#[instrument(skip(state, user, payload))]
pub async fn update_block(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBlockRequest>,
) -> Result<Json<TrainingBlock>, ApiError> {
    if let Some(title) = &payload.title {
        validate_title(title)?;
    }
    if let Some(color) = &payload.color_hex {
        validate_color_hex(color)?;
    }

    let mut block = TrainingBlock::find_owned(&state.db, user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Training block not found"))?;
    payload.apply(&mut block);

    let block = TrainingBlock::update(&state.db, &block)
        .await?
        .ok_or(ApiError::NotFound("Training block not found"))?;
    info!(block_id = %block.id, "training block updated");
    Ok(Json(block))
}

#[instrument(skip(state, user))]
pub async fn delete_block(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !TrainingBlock::delete_owned(&state.db, user.id, id).await? {
        return Err(ApiError::NotFound("Training block not found"));
    }
    info!(block_id = %id, user_id = %user.id, "training block deleted");
    Ok(StatusCode::NO_CONTENT)
}
