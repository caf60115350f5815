//! Delivery preference endpoints.

use axum::Json;
use axum::extract::State;

use socialhub_entity::notification::NotificationPreference;

use crate::dto::request::UpdatePreferencesRequest;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications/preferences
pub async fn get(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<NotificationPreference>, ApiError> {
    Ok(Json(state.preferences.get_or_create(ctx.user_id).await?))
}

/// PUT /api/notifications/preferences
pub async fn update(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Json(body): Json<UpdatePreferencesRequest>,
) -> Result<Json<NotificationPreference>, ApiError> {
    let current = state.preferences.get_or_create(ctx.user_id).await?;
    let merged = body.apply(current);
    Ok(Json(state.preferences.save(ctx.user_id, merged).await?))
}
