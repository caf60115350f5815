//! Domain-event ingress.
//!
//! Upstream services (posts, comments, social graph) report mutations
//! here; the producers translate them into notifications.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use socialhub_core::error::AppError;
use socialhub_core::events::DomainEvent;

use crate::dto::response::EventAcceptedResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/events
pub async fn ingest(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Json(event): Json<DomainEvent>,
) -> Result<(StatusCode, Json<EventAcceptedResponse>), ApiError> {
    // Only trusted internal callers may report events.
    if !ctx.is_admin() {
        return Err(AppError::forbidden("Admin role required").into());
    }
    let produced = state.producers.handle(event).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(EventAcceptedResponse {
            produced: produced.len(),
        }),
    ))
}
