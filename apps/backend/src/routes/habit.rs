//! Habit and checkin endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

const DEFAULT_TARGET_FREQUENCY: &str = "daily";

/// GET /api/habit
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<DbHabit>>> {
    let habits = state.db.get_habits(auth.user_id).await?;
    Ok(Json(habits))
}

/// POST /api/habit
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateHabitRequest>,
) -> Result<(StatusCode, Json<DbHabit>)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Habit name is required".to_string()));
    }

    let target_frequency = payload
        .target_frequency
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .unwrap_or(DEFAULT_TARGET_FREQUENCY);

    let habit = state
        .db
        .create_habit(
            auth.user_id,
            name,
            payload.description.as_deref(),
            target_frequency,
            payload.category.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(habit)))
}

/// DELETE /api/habit?id=
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<DeleteHabitQuery>,
) -> Result<StatusCode> {
    let habit_id = query
        .id
        .ok_or_else(|| ApiError::BadRequest("Habit id is required".to_string()))?;

    if !state.db.delete_habit(auth.user_id, habit_id).await? {
        return Err(ApiError::NotFound(format!("Habit not found: {}", habit_id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/habit/checkin
/// Records (or overwrites) the checkin for a habit and date
pub async fn checkin(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CheckinRequest>,
) -> Result<Json<DbCheckin>> {
    state
        .db
        .get_habit(auth.user_id, payload.habit_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Habit not found: {}", payload.habit_id)))?;

    let checkin = state
        .db
        .upsert_checkin(
            auth.user_id,
            payload.habit_id,
            payload.date,
            payload.completed,
            payload.notes.as_deref(),
        )
        .await?;

    Ok(Json(checkin))
}

/// GET /api/habit/checkin?habit_id&start_date&end_date
pub async fn list_checkins(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<CheckinQuery>,
) -> Result<Json<Vec<DbCheckin>>> {
    // The range only applies when both bounds are given.
    let range = query.start_date.zip(query.end_date);
    let checkins = state
        .db
        .get_checkins(auth.user_id, query.habit_id, range)
        .await?;

    Ok(Json(checkins))
}
