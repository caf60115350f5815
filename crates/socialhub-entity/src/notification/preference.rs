//! Per-user notification delivery preferences.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use socialhub_core::types::id::UserId;

use super::kind::NotificationKind;

/// A channel through which a notification can be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryChannel {
    Email,
    Push,
    InApp,
}

/// Per-user delivery preferences: one toggle per (channel, kind) pair
/// plus an optional quiet-hours window.
///
/// Quiet hours gate live push only. Persistence is never affected, and
/// unread counts still move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct NotificationPreference {
    pub user_id: UserId,

    pub email_follows: bool,
    pub email_likes: bool,
    pub email_comments: bool,
    pub email_mentions: bool,
    pub email_system: bool,

    pub push_follows: bool,
    pub push_likes: bool,
    pub push_comments: bool,
    pub push_mentions: bool,
    pub push_system: bool,

    pub in_app_follows: bool,
    pub in_app_likes: bool,
    pub in_app_comments: bool,
    pub in_app_mentions: bool,
    pub in_app_system: bool,

    pub quiet_hours_enabled: bool,
    pub quiet_hours_start: Option<NaiveTime>,
    pub quiet_hours_end: Option<NaiveTime>,

    pub updated_at: DateTime<Utc>,
}

impl NotificationPreference {
    /// Defaults for a user with no stored row: everything on, no quiet
    /// hours.
    pub fn default_for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            email_follows: true,
            email_likes: true,
            email_comments: true,
            email_mentions: true,
            email_system: true,
            push_follows: true,
            push_likes: true,
            push_comments: true,
            push_mentions: true,
            push_system: true,
            in_app_follows: true,
            in_app_likes: true,
            in_app_comments: true,
            in_app_mentions: true,
            in_app_system: true,
            quiet_hours_enabled: false,
            quiet_hours_start: None,
            quiet_hours_end: None,
            updated_at: Utc::now(),
        }
    }

    /// Whether the given kind is enabled on the given channel.
    pub fn is_enabled(&self, kind: NotificationKind, channel: DeliveryChannel) -> bool {
        use DeliveryChannel::*;
        use NotificationKind::*;
        match (channel, kind) {
            (Email, Follow) => self.email_follows,
            (Email, Like) => self.email_likes,
            (Email, Comment) => self.email_comments,
            (Email, Mention) => self.email_mentions,
            (Email, System) => self.email_system,
            (Push, Follow) => self.push_follows,
            (Push, Like) => self.push_likes,
            (Push, Comment) => self.push_comments,
            (Push, Mention) => self.push_mentions,
            (Push, System) => self.push_system,
            (InApp, Follow) => self.in_app_follows,
            (InApp, Like) => self.in_app_likes,
            (InApp, Comment) => self.in_app_comments,
            (InApp, Mention) => self.in_app_mentions,
            (InApp, System) => self.in_app_system,
        }
    }

    /// Whether `now` falls inside the quiet-hours window.
    ///
    /// A window whose start is later than its end wraps past midnight
    /// (22:00..06:00 covers 23:00 and 03:00 but not 12:00). Disabled or
    /// incompletely configured windows never match.
    pub fn in_quiet_hours(&self, now: NaiveTime) -> bool {
        if !self.quiet_hours_enabled {
            return false;
        }
        let (Some(start), Some(end)) = (self.quiet_hours_start, self.quiet_hours_end) else {
            return false;
        };
        if start <= end {
            now >= start && now <= end
        } else {
            now >= start || now <= end
        }
    }
}
