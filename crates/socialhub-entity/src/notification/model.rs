//! The durable notification record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use socialhub_core::types::id::{NotificationId, UserId};

use super::kind::NotificationKind;
use super::subject::SubjectRef;

/// Maximum length of a notification title.
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum length of a notification message.
pub const MAX_MESSAGE_LEN: usize = 200;

/// A persisted notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    /// Absent for system notifications.
    pub sender_id: Option<UserId>,
    /// Denormalized at creation time so delivery needs no user lookup.
    pub sender_username: Option<String>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub subject: Option<SubjectRef>,
    /// Free-form extra data attached by the producer.
    pub payload: Value,
    pub is_read: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Human-readable one-line summary, used in list views and live
    /// delivery frames. System notifications (and any record without a
    /// sender) fall back to the stored message.
    pub fn notification_text(&self) -> String {
        let Some(username) = &self.sender_username else {
            return self.message.clone();
        };
        match self.kind {
            NotificationKind::Follow => format!("{username} started following you"),
            NotificationKind::Like => format!("{username} liked your post"),
            NotificationKind::Comment => format!("{username} commented on your post"),
            NotificationKind::Mention => format!("{username} mentioned you in a comment"),
            NotificationKind::System => self.message.clone(),
        }
    }

    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}

// Assembled by hand: `kind` is stored as TEXT and `subject` spans the
// (subject_kind, subject_id) column pair.
impl<'r> FromRow<'r, PgRow> for Notification {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let kind: String = row.try_get("kind")?;
        let kind: NotificationKind = kind
            .parse()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "kind".into(),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("{e}"),
                )),
            })?;

        let subject_kind: Option<String> = row.try_get("subject_kind")?;
        let subject_id: Option<uuid::Uuid> = row.try_get("subject_id")?;
        let subject = match (subject_kind, subject_id) {
            (Some(k), Some(id)) => Some(SubjectRef::from_columns(&k, id).map_err(|e| {
                sqlx::Error::ColumnDecode {
                    index: "subject_kind".into(),
                    source: Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("{e}"),
                    )),
                }
            })?),
            _ => None,
        };

        Ok(Self {
            id: row.try_get("id")?,
            recipient_id: row.try_get("recipient_id")?,
            sender_id: row.try_get("sender_id")?,
            sender_username: row.try_get("sender_username")?,
            kind,
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            subject,
            payload: row.try_get("payload")?,
            is_read: row.try_get("is_read")?,
            is_archived: row.try_get("is_archived")?,
            created_at: row.try_get("created_at")?,
            read_at: row.try_get("read_at")?,
        })
    }
}

/// Sender identity captured when a notification is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: UserId,
    pub username: String,
}

/// Input for creating a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: UserId,
    pub sender: Option<Sender>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub subject: Option<SubjectRef>,
    pub payload: Value,
}

impl NewNotification {
    /// Materialize into a full record with a fresh id and timestamp.
    pub fn into_notification(self, now: DateTime<Utc>) -> Notification {
        let (sender_id, sender_username) = match self.sender {
            Some(s) => (Some(s.id), Some(s.username)),
            None => (None, None),
        };
        Notification {
            id: NotificationId::new(),
            recipient_id: self.recipient_id,
            sender_id,
            sender_username,
            kind: self.kind,
            title: self.title,
            message: self.message,
            subject: self.subject,
            payload: self.payload,
            is_read: false,
            is_archived: false,
            created_at: now,
            read_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(sender: Option<Sender>) -> Notification {
        NewNotification {
            recipient_id: UserId::new(),
            sender,
            kind: NotificationKind::Like,
            title: "New like".into(),
            message: "liked your post".into(),
            subject: None,
            payload: Value::Null,
        }
        .into_notification(Utc::now())
    }

    #[test]
    fn test_notification_text_with_sender() {
        let n = sample(Some(Sender {
            id: UserId::new(),
            username: "alice".into(),
        }));
        assert_eq!(n.notification_text(), "alice liked your post");
    }

    #[test]
    fn test_notification_text_without_sender_uses_message() {
        let n = sample(None);
        assert_eq!(n.notification_text(), "liked your post");
    }

    #[test]
    fn test_new_notification_starts_unread() {
        let n = sample(None);
        assert!(n.is_unread());
        assert!(!n.is_archived);
        assert!(n.read_at.is_none());
    }
}
