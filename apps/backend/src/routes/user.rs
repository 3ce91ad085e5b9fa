//! User registration and onboarding status

use axum::{extract::State, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::{RegisterUserRequest, RegisterUserResponse, Role, UserStatusResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// POST /api/user/register
/// Issues a bearer token for a new user; a blank name is stored as none
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Option<RegisterUserRequest>>,
) -> Result<Json<RegisterUserResponse>> {
    let name = payload
        .and_then(|p| p.name)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let user = state.db.create_user(name.as_deref()).await?;

    tracing::info!(user_id = %user.id, "Registered user");

    Ok(Json(RegisterUserResponse {
        user_id: user.id,
        token: user.token,
    }))
}

/// GET /api/user/status
/// Identity plus whether onboarding is done, so clients know to show it
pub async fn status(
    Extension(auth): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<UserStatusResponse>> {
    let user = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let role = state
        .db
        .get_preferences(user.id)
        .await?
        .map(|p| p.role.unwrap_or_else(|| Role::default().as_str().to_string()));

    Ok(Json(UserStatusResponse {
        user_id: user.id,
        name: user.name,
        last_seen_at: user.last_seen_at,
        onboarded: role.is_some(),
        role,
    }))
}
