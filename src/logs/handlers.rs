use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{validate_sets, CreateLogRequest, LogDetails, LogFilters, UpdateLogRequest},
    repo::{ExerciseLog, LogQuery},
};
use crate::{
    auth::{extractors::CurrentUser, UserOut},
    blocks::repo::TrainingBlock,
    error::ApiError,
    exercises::Exercise,
    state::AppState,
};

pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/exercise_logs", post(create_log).get(list_logs))
        .route(
            "/exercise_logs/:id",
            get(get_log).put(update_log).delete(delete_log),
        )
}

#[instrument(skip(state, user, payload))]
pub async fn create_log(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateLogRequest>,
) -> Result<(StatusCode, Json<ExerciseLog>), ApiError> {
    validate_sets(&payload.sets_reps_data)?;

    // The referenced block must belong to the caller; a foreign block
    // reads as absent.
    TrainingBlock::find_owned(&state.db, user.id, payload.training_block_id)
        .await?
        .ok_or(ApiError::NotFound("Training block not found"))?;
    Exercise::find(&state.db, payload.exercise_id)
        .await?
        .ok_or(ApiError::NotFound("Exercise not found"))?;

    let log_date = payload
        .log_date
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());
    let sets = serde_json::to_value(&payload.sets_reps_data)
        .map_err(|e| ApiError::Internal(e.into()))?;

    let log = ExerciseLog::create(
        &state.db,
        user.id,
        payload.training_block_id,
        payload.exercise_id,
        log_date,
        &sets,
        payload.notes.as_deref(),
    )
    .await?;
    info!(log_id = %log.id, user_id = %user.id, "exercise log created");
    Ok((StatusCode::CREATED, Json(log)))
}

#[instrument(skip(state, user))]
pub async fn list_logs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filters): Query<LogFilters>,
) -> Result<Json<Vec<LogDetails>>, ApiError> {
    let query = LogQuery {
        training_block_id: filters.training_block_id,
        exercise_id: filters.exercise_id,
        log_date: filters.log_date,
    };
    let rows =
        ExerciseLog::list_with_details(&state.db, user.id, &query, filters.skip, filters.limit)
            .await?;

    let user_out = UserOut::from(user);
    Ok(Json(
        rows.into_iter()
            .map(|(log, exercise, block)| {
                LogDetails::new(log, exercise, block, user_out.clone())
            })
            .collect(),
    ))
}

#[instrument(skip(state, user))]
pub async fn get_log(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<LogDetails>, ApiError> {
    let (log, exercise, block) = ExerciseLog::find_owned_with_details(&state.db, user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Exercise log not found"))?;
    Ok(Json(LogDetails::new(log, exercise, block, UserOut::from(user))))
}

#[instrument(skip(state, user, payload))]
pub async fn update_log(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLogRequest>,
) -> Result<Json<ExerciseLog>, ApiError> {
    if let Some(sets) = &payload.sets_reps_data {
        validate_sets(sets)?;
    }

    let mut log = ExerciseLog::find_owned(&state.db, user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Exercise log not found"))?;

    // Re-pointing the log at another block requires owning that block too.
    if let Some(new_block_id) = payload.training_block_id {
        if new_block_id != log.training_block_id {
            TrainingBlock::find_owned(&state.db, user.id, new_block_id)
                .await?
                .ok_or(ApiError::NotFound("Training block not found"))?;
        }
    }

    payload.apply(&mut log);
    if let Some(sets) = &payload.sets_reps_data {
        log.sets_reps_data =
            serde_json::to_value(sets).map_err(|e| ApiError::Internal(e.into()))?;
    }

    let log = ExerciseLog::update(&state.db, &log)
        .await?
        .ok_or(ApiError::NotFound("Exercise log not found"))?;
    info!(log_id = %log.id, "exercise log updated");
    Ok(Json(log))
}

#[instrument(skip(state, user))]
pub async fn delete_log(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !ExerciseLog::delete_owned(&state.db, user.id, id).await? {
        return Err(ApiError::NotFound("Exercise log not found"));
    }
    info!(log_id = %id, user_id = %user.id, "exercise log deleted");
    Ok(StatusCode::NO_CONTENT)
}
