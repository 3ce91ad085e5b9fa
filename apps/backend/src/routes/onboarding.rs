//! Onboarding and preference endpoints

use axum::{extract::State, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// POST /api/onboarding
/// Saves (or replaces) the caller's preferences
pub async fn save(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<OnboardingRequest>,
) -> Result<Json<DbPreferences>> {
    let input = PreferencesInput::from_onboarding(payload)?;
    let saved = state.db.upsert_preferences(auth.user_id, &input).await?;

    tracing::info!(user_id = %auth.user_id, role = %input.role, "Saved onboarding preferences");

    Ok(Json(saved))
}

/// GET /api/onboarding
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<DataResponse<DbPreferences>>> {
    let data = state.db.get_preferences(auth.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/preferences
/// Partial update of stored preferences
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<UpdatePreferencesRequest>,
) -> Result<Json<DbPreferences>> {
    let current = state
        .db
        .get_preferences(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Preferences not found".to_string()))?;

    let input = PreferencesInput::merged(&current, payload)?;
    let saved = state.db.upsert_preferences(auth.user_id, &input).await?;

    Ok(Json(saved))
}
