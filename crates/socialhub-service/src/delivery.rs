//! Live delivery seam.
//!
//! The notification service persists first and then hands the record to
//! a [`DeliverySink`]. The realtime layer provides the production
//! implementation; tests plug in recording sinks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use socialhub_core::result::AppResult;
use socialhub_core::types::id::{NotificationId, UserId};
use socialhub_entity::notification::Notification;

/// Field-level state change pushed to a recipient's live connections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotificationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

impl NotificationUpdate {
    pub fn read(read_at: DateTime<Utc>) -> Self {
        Self {
            is_read: Some(true),
            read_at: Some(read_at),
            ..Default::default()
        }
    }

    pub fn archived(archived: bool) -> Self {
        Self {
            is_archived: Some(archived),
            ..Default::default()
        }
    }
}

/// Push side of notification delivery.
///
/// Implementations must be best-effort and non-blocking with respect to
/// persistence: a failed or skipped delivery never unwinds a stored
/// notification.
#[async_trait]
pub trait DeliverySink: Send + Sync {
    /// Push a freshly created notification to its recipient.
    async fn deliver(&self, notification: &Notification) -> AppResult<()>;

    /// Push a state change for an existing notification.
    async fn deliver_update(
        &self,
        recipient_id: UserId,
        notification_id: NotificationId,
        update: &NotificationUpdate,
    ) -> AppResult<()>;
}

/// Sink that drops everything. Used when no realtime layer is wired.
#[derive(Debug, Clone, Default)]
pub struct NullDeliverySink;

#[async_trait]
impl DeliverySink for NullDeliverySink {
    async fn deliver(&self, _notification: &Notification) -> AppResult<()> {
        Ok(())
    }

    async fn deliver_update(
        &self,
        _recipient_id: UserId,
        _notification_id: NotificationId,
        _update: &NotificationUpdate,
    ) -> AppResult<()> {
        Ok(())
    }
}
