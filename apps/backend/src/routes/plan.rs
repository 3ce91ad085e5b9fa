//! Daily plan endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{Local, NaiveDate};
use routine_core::{completion_rate, toggle_block};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// POST /api/plan/generate
/// Generates and stores the plan for a date
pub async fn generate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<GeneratePlanRequest>,
) -> Result<Json<DbPlan>> {
    let preferences = state
        .db
        .get_preferences(auth.user_id)
        .await?
        .ok_or_else(|| {
            ApiError::PreconditionsNotMet("Please complete onboarding first".to_string())
        })?;

    if state.db.get_plan(auth.user_id, payload.date).await?.is_some() {
        return Err(conflict());
    }

    let request = preferences.to_routine_request()?;
    let blocks = state.planner.generate_routine(&request).await;

    // A concurrent request may have won the slot while the model was running.
    let plan = state
        .db
        .insert_plan(auth.user_id, payload.date, &blocks, 0.0)
        .await?
        .ok_or_else(conflict)?;

    tracing::info!(
        user_id = %auth.user_id,
        date = %payload.date,
        blocks = blocks.len(),
        "Generated plan"
    );

    Ok(Json(plan))
}

fn conflict() -> ApiError {
    ApiError::Conflict("Plan already exists for this date".to_string())
}

/// GET /api/plan/:date
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<DataResponse<DbPlan>>> {
    let data = state.db.get_plan(auth.user_id, date).await?;
    Ok(Json(DataResponse { data }))
}

async fn existing_plan(
    state: &AppState,
    auth: &AuthenticatedUser,
    date: NaiveDate,
) -> Result<DbPlan> {
    state
        .db
        .get_plan(auth.user_id, date)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No plan found for {}", date)))
}

/// PUT /api/plan/:date
/// Replaces the plan's blocks
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(date): Path<NaiveDate>,
    Json(payload): Json<UpdatePlanRequest>,
) -> Result<Json<DbPlan>> {
    let plan = existing_plan(&state, &auth, date).await?;
    let rate = completion_rate(&payload.blocks);
    let plan = state
        .db
        .update_plan_blocks(plan.id, &payload.blocks, rate)
        .await?;

    Ok(Json(plan))
}

/// POST /api/plan/:date/blocks/:block_id/toggle
pub async fn toggle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((date, block_id)): Path<(NaiveDate, String)>,
) -> Result<Json<ToggleBlockResponse>> {
    let plan = existing_plan(&state, &auth, date).await?;

    let mut blocks = plan.blocks.0;
    let completed = toggle_block(&mut blocks, &block_id)
        .ok_or_else(|| ApiError::NotFound(format!("Block not found: {}", block_id)))?;

    let rate = completion_rate(&blocks);
    let plan = state.db.update_plan_blocks(plan.id, &blocks, rate).await?;

    Ok(Json(ToggleBlockResponse {
        plan,
        block_id,
        completed,
    }))
}

/// PUT /api/plan/replan
/// Regenerates the unfinished part of the day from the current time
pub async fn replan(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<ReplanRequest>,
) -> Result<Json<ReplanResponse>> {
    let now = payload
        .current_time
        .unwrap_or_else(|| ClockTime::from_naive_time(Local::now().time()));

    let plan = state.db.get_plan(auth.user_id, payload.date).await?;
    let preferences = state.db.get_preferences(auth.user_id).await?;

    let replanned = state
        .planner
        .replan_day(plan.as_ref(), preferences.as_ref(), now)
        .await?;

    let plan = state
        .db
        .update_plan_blocks(
            replanned.plan_id,
            &replanned.outcome.blocks,
            replanned.outcome.completion_rate,
        )
        .await?;

    Ok(Json(ReplanResponse {
        plan,
        current_time: now,
        retained_count: replanned.retained_count,
        generated_count: replanned.generated_count,
    }))
}

/// GET /api/ai/status
/// Probes the generative model
pub async fn model_status(State(state): State<AppState>) -> Result<Json<ModelStatusResponse>> {
    let reachable = state.planner.check_connection().await;
    Ok(Json(ModelStatusResponse {
        model: state.planner.model_name().to_string(),
        reachable,
    }))
}
