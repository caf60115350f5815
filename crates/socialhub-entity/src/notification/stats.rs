//! Aggregate notification statistics for one recipient.

use serde::{Deserialize, Serialize};

/// Per-recipient counts across status and kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationStats {
    pub total_notifications: u64,
    pub unread_count: u64,
    pub read_count: u64,
    pub archived_count: u64,
    pub follow_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub mention_count: u64,
    pub system_count: u64,
}
