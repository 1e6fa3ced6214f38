use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{
        validate_category, validate_name, CreateExerciseRequest, ExerciseFilters,
        UpdateExerciseRequest,
    },
    repo::Exercise,
};
use crate::{
    auth::extractors::CurrentUser, blocks::repo::TrainingBlock, error::ApiError, state::AppState,
};

pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/exercises", post(create_exercise).get(list_exercises))
        .route(
            "/exercises/:id",
            get(get_exercise).put(update_exercise).delete(delete_exercise),
        )
        .route(
            "/exercises/by_training_block/:block_id",
            get(exercises_by_training_block),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_exercise(
    State(state): State<AppState>,
    Json(payload): Json<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<Exercise>), ApiError> {
    validate_name(&payload.name)?;
    if let Some(category) = &payload.category {
        validate_category(category)?;
    }

    if Exercise::find_by_name_ci(&state.db, &payload.name)
        .await?
        .is_some()
    {
        warn!(name = %payload.name, "exercise name already exists");
        return Err(ApiError::Conflict("Exercise with this name already exists"));
    }

    let exercise = Exercise::create(
        &state.db,
        &payload.name,
        payload.description.as_deref(),
        payload.category.as_deref(),
    )
    .await?;
    info!(exercise_id = %exercise.id, name = %exercise.name, "exercise created");
    Ok((StatusCode::CREATED, Json(exercise)))
}

#[instrument(skip(state))]
pub async fn list_exercises(
    State(state): State<AppState>,
    Query(filters): Query<ExerciseFilters>,
) -> Result<Json<Vec<Exercise>>, ApiError> {
    let exercises = Exercise::list(
        &state.db,
        filters.category.as_deref(),
        filters.search.as_deref(),
        filters.skip,
        filters.limit,
    )
    .await?;
    Ok(Json(exercises))
}

#[instrument(skip(state))]
pub async fn get_exercise(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Exercise>, ApiError> {
    let exercise = Exercise::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Exercise not found"))?;
    Ok(Json(exercise))
}

#[instrument(skip(state, payload))]
pub async fn update_exercise(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateExerciseRequest>,
) -> Result<Json<Exercise>, ApiError> {
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    if let Some(category) = &payload.category {
        validate_category(category)?;
    }

    let mut exercise = Exercise::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Exercise not found"))?;

    // Renaming must not collide with another exercise.
    if let Some(name) = &payload.name {
        if !name.eq_ignore_ascii_case(&exercise.name) {
            if let Some(existing) = Exercise::find_by_name_ci(&state.db, name).await? {
                if existing.id != exercise.id {
                    return Err(ApiError::Conflict(
                        "Another exercise with this name already exists",
                    ));
                }
            }
        }
    }

    payload.apply(&mut exercise);
    let exercise = Exercise::update(&state.db, &exercise)
        .await?
        .ok_or(ApiError::NotFound("Exercise not found"))?;
    info!(exercise_id = %exercise.id, "exercise updated");
    Ok(Json(exercise))
}

#[instrument(skip(state))]
pub async fn delete_exercise(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !Exercise::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Exercise not found"));
    }
    info!(exercise_id = %id, "exercise deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// The block is an owned resource, so this view requires the caller to
/// own it; a foreign block reads as absent.
#[instrument(skip(state, user))]
pub async fn exercises_by_training_block(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(block_id): Path<Uuid>,
) -> Result<Json<Vec<Exercise>>, ApiError> {
    TrainingBlock::find_owned(&state.db, user.id, block_id)
        .await?
        .ok_or(ApiError::NotFound("Training block not found"))?;

    let exercises = Exercise::list_for_block(&state.db, block_id).await?;
    Ok(Json(exercises))
}
