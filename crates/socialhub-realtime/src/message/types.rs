//! Typed client/server frames.
//!
//! Frames are JSON objects discriminated by a `type` field. Field names
//! are part of the client contract and must not change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use socialhub_core::result::AppResult;
use socialhub_core::types::id::{NotificationId, UserId};
use socialhub_entity::notification::{Notification, NotificationKind};
use socialhub_service::delivery::NotificationUpdate;

/// Frames a client may send.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    /// Keepalive probe. The timestamp is opaque and echoed back as-is.
    Ping {
        #[serde(default)]
        timestamp: Value,
    },
    /// Request the current unread count.
    GetNotifications,
    /// Any frame with an unrecognized type tag. Silently ignored.
    #[serde(other)]
    Unknown,
}

/// Frames the server sends.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundFrame {
    /// First frame on every accepted connection.
    ConnectionEstablished { message: String, user_id: UserId },
    Pong { timestamp: Value },
    NotificationsCount { unread_count: u64 },
    /// A freshly created notification, pushed to the recipient.
    Notification { notification: NotificationView },
    /// A state change to an existing notification.
    NotificationUpdate {
        notification_id: NotificationId,
        update_data: NotificationUpdate,
    },
    Error { message: String },
}

impl OutboundFrame {
    pub fn established(user_id: UserId) -> Self {
        Self::ConnectionEstablished {
            message: "Connected to notifications".to_string(),
            user_id,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Serialize to the wire representation.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Client-facing projection of a stored notification.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    pub id: NotificationId,
    pub sender_username: Option<String>,
    pub notification_type: NotificationKind,
    pub title: String,
    pub message: String,
    pub notification_text: String,
    pub is_read: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationView {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            sender_username: n.sender_username.clone(),
            notification_type: n.kind,
            title: n.title.clone(),
            message: n.message.clone(),
            notification_text: n.notification_text(),
            is_read: n.is_read,
            is_archived: n.is_archived,
            created_at: n.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use socialhub_entity::notification::{NewNotification, Sender};

    use super::*;

    #[test]
    fn test_inbound_ping_parses_with_and_without_timestamp() {
        let frame: InboundFrame =
            serde_json::from_str(r#"{"type":"ping","timestamp":1234}"#).unwrap();
        assert!(matches!(frame, InboundFrame::Ping { timestamp } if timestamp == json!(1234)));

        let frame: InboundFrame = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(frame, InboundFrame::Ping { timestamp } if timestamp.is_null()));
    }

    #[test]
    fn test_inbound_unknown_type_tolerated() {
        let frame: InboundFrame = serde_json::from_str(r#"{"type":"subscribe"}"#).unwrap();
        assert!(matches!(frame, InboundFrame::Unknown));
    }

    #[test]
    fn test_outbound_pong_shape() {
        let frame = OutboundFrame::Pong {
            timestamp: json!(99),
        };
        let v: Value = serde_json::from_str(&frame.to_json().unwrap()).unwrap();
        assert_eq!(v, json!({"type": "pong", "timestamp": 99}));
    }

    #[test]
    fn test_outbound_count_shape() {
        let frame = OutboundFrame::NotificationsCount { unread_count: 7 };
        let v: Value = serde_json::from_str(&frame.to_json().unwrap()).unwrap();
        assert_eq!(v, json!({"type": "notifications_count", "unread_count": 7}));
    }

    #[test]
    fn test_notification_frame_shape() {
        let n = NewNotification {
            recipient_id: UserId::new(),
            sender: Some(Sender {
                id: UserId::new(),
                username: "alice".into(),
            }),
            kind: NotificationKind::Like,
            title: "New Like".into(),
            message: "alice liked your post".into(),
            subject: None,
            payload: Value::Null,
        }
        .into_notification(Utc::now());

        let frame = OutboundFrame::Notification {
            notification: NotificationView::from(&n),
        };
        let v: Value = serde_json::from_str(&frame.to_json().unwrap()).unwrap();
        assert_eq!(v["type"], "notification");
        let view = &v["notification"];
        assert_eq!(view["sender_username"], "alice");
        assert_eq!(view["notification_type"], "like");
        assert_eq!(view["notification_text"], "alice liked your post");
        assert_eq!(view["is_read"], false);
        assert!(view["created_at"].is_string());
    }

    #[test]
    fn test_update_frame_omits_unset_fields() {
        let frame = OutboundFrame::NotificationUpdate {
            notification_id: NotificationId::new(),
            update_data: NotificationUpdate::archived(true),
        };
        let v: Value = serde_json::from_str(&frame.to_json().unwrap()).unwrap();
        assert_eq!(v["type"], "notification_update");
        assert_eq!(v["update_data"], json!({"is_archived": true}));
    }
}
