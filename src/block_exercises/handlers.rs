use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{validate_order, CreateLinkRequest, LinkWithExercise, UpdateLinkRequest},
    repo::TrainingBlockExercise,
};
use crate::{
    auth::extractors::CurrentUser, blocks::repo::TrainingBlock, error::ApiError,
    exercises::Exercise, state::AppState,
};

pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/training_block_exercises", post(create_link))
        .route(
            "/training_block_exercises/by_block/:block_id",
            get(links_for_block),
        )
        .route(
            "/training_block_exercises/:id",
            get(get_link).put(update_link).delete(delete_link),
        )
}

#[instrument(skip(state, user, payload))]
pub async fn create_link(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<TrainingBlockExercise>), ApiError> {
    validate_order(payload.order_in_block)?;

    // The referenced block must belong to the caller; a foreign block
    // reads as absent.
    TrainingBlock::find_owned(&state.db, user.id, payload.training_block_id)
        .await?
        .ok_or(ApiError::NotFound("Training block not found"))?;
    Exercise::find(&state.db, payload.exercise_id)
        .await?
        .ok_or(ApiError::NotFound("Exercise not found"))?;

    if TrainingBlockExercise::pair_exists(&state.db, payload.training_block_id, payload.exercise_id)
        .await?
    {
        warn!(
            block_id = %payload.training_block_id,
            exercise_id = %payload.exercise_id,
            "exercise already linked to block"
        );
        return Err(ApiError::Conflict(
            "Exercise already exists in this training block",
        ));
    }

    let link = TrainingBlockExercise::create(
        &state.db,
        payload.training_block_id,
        payload.exercise_id,
        payload.order_in_block,
    )
    .await?;
    info!(link_id = %link.id, block_id = %link.training_block_id, "exercise added to block");
    Ok((StatusCode::CREATED, Json(link)))
}

#[instrument(skip(state, user))]
pub async fn links_for_block(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(block_id): Path<Uuid>,
) -> Result<Json<Vec<LinkWithExercise>>, ApiError> {
    TrainingBlock::find_owned(&state.db, user.id, block_id)
        .await?
        .ok_or(ApiError::NotFound("Training block not found"))?;

    let links = TrainingBlockExercise::list_for_block_with_exercise(&state.db, block_id).await?;
    Ok(Json(
        links
            .into_iter()
            .map(|(link, exercise)| LinkWithExercise::new(link, exercise))
            .collect(),
    ))
}

#[instrument(skip(state, user))]
pub async fn get_link(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TrainingBlockExercise>, ApiError> {
    let link = TrainingBlockExercise::find_owned(&state.db, user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Training block exercise link not found"))?;
    Ok(Json(link))
}

#[instrument(skip(state, user, payload))]
pub async fn update_link(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<TrainingBlockExercise>, ApiError> {
    let link = TrainingBlockExercise::find_owned(&state.db, user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Training block exercise link not found"))?;

    let order_in_block = match payload.order_in_block {
        Some(order) => {
            validate_order(order)?;
            order
        }
        None => link.order_in_block,
    };

    let link = TrainingBlockExercise::update_owned(&state.db, user.id, id, order_in_block)
        .await?
        .ok_or(ApiError::NotFound("Training block exercise link not found"))?;
    info!(link_id = %link.id, "block exercise link updated");
    Ok(Json(link))
}

#[instrument(skip(state, user))]
pub async fn delete_link(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !TrainingBlockExercise::delete_owned(&state.db, user.id, id).await? {
        return Err(ApiError::NotFound("Training block exercise link not found"));
    }
    info!(link_id = %id, "block exercise link removed");
    Ok(StatusCode::NO_CONTENT)
}
