//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use socialhub_core::types::id::NotificationId;
use socialhub_entity::notification::{Notification, NotificationKind};

/// REST projection of a stored notification.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: NotificationId,
    pub sender_username: Option<String>,
    pub notification_type: NotificationKind,
    pub title: String,
    pub message: String,
    pub notification_text: String,
    pub payload: Value,
    pub is_read: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<&Notification> for NotificationResponse {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            sender_username: n.sender_username.clone(),
            notification_type: n.kind,
            title: n.title.clone(),
            message: n.message.clone(),
            notification_text: n.notification_text(),
            payload: n.payload.clone(),
            is_read: n.is_read,
            is_archived: n.is_archived,
            created_at: n.created_at,
            read_at: n.read_at,
        }
    }
}

/// Generic confirmation body.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationCreatedResponse {
    pub message: String,
    pub notification_id: NotificationId,
}

/// Outcome of an ingested domain event.
#[derive(Debug, Clone, Serialize)]
pub struct EventAcceptedResponse {
    /// How many notifications the event produced.
    pub produced: usize,
}
