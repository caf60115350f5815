//! Admin-only notification endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use socialhub_core::error::AppError;
use socialhub_core::types::id::NotificationId;
use socialhub_core::types::pagination::PageResponse;
use socialhub_entity::notification::{NewNotification, Sender};

use crate::dto::request::{AdminListQuery, CreateNotificationRequest};
use crate::dto::response::{MessageResponse, NotificationCreatedResponse, NotificationResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, Pagination};
use crate::state::AppState;

/// GET /api/notifications/admin — list across all recipients.
pub async fn list_all(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Pagination(page): Pagination,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<PageResponse<NotificationResponse>>, ApiError> {
    let filter = query.to_filter()?;

    // The recipient filter takes a username. An unknown username yields
    // an empty page, matching the filter semantics of the list itself.
    let recipient_id = match &query.recipient {
        Some(username) => match state.users.find_by_username(username).await? {
            Some(user) => Some(user.id),
            None => {
                return Ok(Json(PageResponse::new(
                    Vec::new(),
                    page.page,
                    page.page_size,
                    0,
                )));
            }
        },
        None => None,
    };

    let result = state
        .notifications
        .list_all(&ctx, recipient_id, &filter, &page)
        .await?;
    Ok(Json(PageResponse::new(
        result.items.iter().map(NotificationResponse::from).collect(),
        result.page,
        result.page_size,
        result.total_items,
    )))
}

/// POST /api/notifications/admin — create a notification for any user.
pub async fn create(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Json(body): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<NotificationCreatedResponse>), ApiError> {
    if !ctx.is_admin() {
        return Err(AppError::forbidden("Admin role required").into());
    }
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let notification = state
        .notifications
        .create(NewNotification {
            recipient_id: body.recipient_id,
            sender: Some(Sender {
                id: ctx.user_id,
                username: ctx.username.clone(),
            }),
            kind: body.notification_type,
            title: body.title,
            message: body.message,
            subject: None,
            payload: body.payload.unwrap_or(serde_json::Value::Null),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(NotificationCreatedResponse {
            message: "Notification created".into(),
            notification_id: notification.id,
        }),
    ))
}

/// DELETE /api/notifications/admin/{id} — delete any notification.
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !ctx.is_admin() {
        return Err(AppError::forbidden("Admin role required").into());
    }
    state.notifications.delete(&ctx, id).await?;
    Ok(Json(MessageResponse::new(
        "Notification deleted successfully",
    )))
}
