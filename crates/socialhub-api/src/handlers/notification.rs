//! User-facing notification endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use socialhub_core::types::id::NotificationId;
use socialhub_core::types::pagination::PageResponse;
use socialhub_entity::notification::NotificationStats;

use crate::dto::request::ListNotificationsQuery;
use crate::error::ApiError;
use crate::dto::response::{
    MessageResponse, NotificationCreatedResponse, NotificationResponse, UnreadCountResponse,
};
use crate::extractors::{AuthUser, Pagination};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Pagination(page): Pagination,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<PageResponse<NotificationResponse>>, ApiError> {
    let filter = query.to_filter()?;
    let result = state.notifications.list(&ctx, &filter, &page).await?;
    Ok(Json(PageResponse::new(
        result.items.iter().map(NotificationResponse::from).collect(),
        result.page,
        result.page_size,
        result.total_items,
    )))
}

/// GET /api/notifications/stats
pub async fn stats(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<NotificationStats>, ApiError> {
    Ok(Json(state.notifications.stats(&ctx).await?))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let unread_count = state.notifications.unread_count(&ctx).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

/// GET /api/notifications/{id}
pub async fn detail(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let notification = state.notifications.get(&ctx, id).await?;
    Ok(Json(NotificationResponse::from(&notification)))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.notifications.mark_read(&ctx, id).await?;
    Ok(Json(MessageResponse::new("Notification marked as read")))
}

/// POST /api/notifications/mark-all-read
pub async fn mark_all_read(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    let count = state.notifications.mark_all_read(&ctx).await?;
    Ok(Json(MessageResponse::new(format!(
        "{count} notifications marked as read"
    ))))
}

/// POST /api/notifications/{id}/archive
pub async fn archive(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.notifications.set_archived(&ctx, id, true).await?;
    Ok(Json(MessageResponse::new("Notification archived")))
}

/// POST /api/notifications/{id}/unarchive
pub async fn unarchive(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.notifications.set_archived(&ctx, id, false).await?;
    Ok(Json(MessageResponse::new("Notification unarchived")))
}

/// DELETE /api/notifications/{id}
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.notifications.delete(&ctx, id).await?;
    Ok(Json(MessageResponse::new(
        "Notification deleted successfully",
    )))
}

/// POST /api/notifications/test — send a system notification to
/// yourself to verify end-to-end delivery.
pub async fn test_notification(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
) -> Result<(StatusCode, Json<NotificationCreatedResponse>), ApiError> {
    let notification = state
        .notifications
        .create_system(
            ctx.user_id,
            "Test Notification",
            "This is a test notification to verify the system is working.",
            serde_json::Value::Null,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(NotificationCreatedResponse {
            message: "Test notification sent".into(),
            notification_id: notification.id,
        }),
    ))
}
