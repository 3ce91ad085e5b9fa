//! Analytics endpoint

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Local;
use routine_core::analytics::{window_start, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use routine_core::compute_analytics;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

const RECENT_PLANS: usize = 7;

/// Clamp the requested window to 1..=365 days.
pub fn window_days(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_WINDOW_DAYS)
        .clamp(1, MAX_WINDOW_DAYS)
}

/// GET /api/analytics?days=
pub async fn summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>> {
    let days = window_days(query.days);
    let today = Local::now().date_naive();
    let since = window_start(today, days);

    let plans = state.db.get_plans_since(auth.user_id, since).await?;
    let habits = state.db.get_habits(auth.user_id).await?;
    let checkins = state.db.get_checkins_since(auth.user_id, since).await?;

    let plan_snapshots: Vec<PlanSnapshot> = plans.iter().map(DbPlan::to_snapshot).collect();
    let habit_snapshots: Vec<HabitSnapshot> =
        habits.iter().map(|h| h.to_snapshot(&checkins)).collect();

    let summary = compute_analytics(&plan_snapshots, &habit_snapshots, today, days);

    let recent_plans = plans.into_iter().take(RECENT_PLANS).collect();

    Ok(Json(AnalyticsResponse {
        summary,
        recent_plans,
    }))
}
