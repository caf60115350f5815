//! Request DTOs.

use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use socialhub_core::result::AppResult;
use socialhub_core::types::id::UserId;
use socialhub_database::repositories::NotificationFilter;
use socialhub_entity::notification::{NotificationKind, NotificationPreference};

/// Query parameters for the user-facing notification list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListNotificationsQuery {
    pub is_read: Option<bool>,
    pub is_archived: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ListNotificationsQuery {
    pub fn to_filter(&self) -> AppResult<NotificationFilter> {
        Ok(NotificationFilter {
            is_read: self.is_read,
            is_archived: self.is_archived,
            kind: self
                .kind
                .as_deref()
                .map(str::parse::<NotificationKind>)
                .transpose()?,
        })
    }
}

/// Query parameters for the admin notification list. `recipient` is a
/// username.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminListQuery {
    pub recipient: Option<String>,
    pub is_read: Option<bool>,
    pub is_archived: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl AdminListQuery {
    pub fn to_filter(&self) -> AppResult<NotificationFilter> {
        Ok(NotificationFilter {
            is_read: self.is_read,
            is_archived: self.is_archived,
            kind: self
                .kind
                .as_deref()
                .map(str::parse::<NotificationKind>)
                .transpose()?,
        })
    }
}

/// Body for the admin notification-create endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    pub recipient_id: UserId,
    pub notification_type: NotificationKind,
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub message: String,
    #[serde(default)]
    pub payload: Option<Value>,
}

/// Body for preference updates. Every field is optional; omitted fields
/// keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub email_follows: Option<bool>,
    pub email_likes: Option<bool>,
    pub email_comments: Option<bool>,
    pub email_mentions: Option<bool>,
    pub email_system: Option<bool>,

    pub push_follows: Option<bool>,
    pub push_likes: Option<bool>,
    pub push_comments: Option<bool>,
    pub push_mentions: Option<bool>,
    pub push_system: Option<bool>,

    pub in_app_follows: Option<bool>,
    pub in_app_likes: Option<bool>,
    pub in_app_comments: Option<bool>,
    pub in_app_mentions: Option<bool>,
    pub in_app_system: Option<bool>,

    pub quiet_hours_enabled: Option<bool>,
    pub quiet_hours_start: Option<NaiveTime>,
    pub quiet_hours_end: Option<NaiveTime>,
}

impl UpdatePreferencesRequest {
    /// Merge this partial update onto an existing preference row.
    pub fn apply(&self, mut prefs: NotificationPreference) -> NotificationPreference {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = self.$field { prefs.$field = v; })*
            };
        }
        merge!(
            email_follows,
            email_likes,
            email_comments,
            email_mentions,
            email_system,
            push_follows,
            push_likes,
            push_comments,
            push_mentions,
            push_system,
            in_app_follows,
            in_app_likes,
            in_app_comments,
            in_app_mentions,
            in_app_system,
            quiet_hours_enabled,
        );
        if let Some(t) = self.quiet_hours_start {
            prefs.quiet_hours_start = Some(t);
        }
        if let Some(t) = self.quiet_hours_end {
            prefs.quiet_hours_end = Some(t);
        }
        prefs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_parses_kind() {
        let q = ListNotificationsQuery {
            kind: Some("mention".into()),
            ..Default::default()
        };
        let filter = q.to_filter().unwrap();
        assert_eq!(filter.kind, Some(NotificationKind::Mention));
    }

    #[test]
    fn test_list_query_rejects_bad_kind() {
        let q = ListNotificationsQuery {
            kind: Some("poke".into()),
            ..Default::default()
        };
        assert!(q.to_filter().is_err());
    }

    #[test]
    fn test_preferences_partial_merge() {
        let prefs = NotificationPreference::default_for_user(UserId::new());
        let update = UpdatePreferencesRequest {
            in_app_likes: Some(false),
            quiet_hours_enabled: Some(true),
            quiet_hours_start: Some(NaiveTime::from_hms_opt(22, 0, 0).unwrap()),
            quiet_hours_end: Some(NaiveTime::from_hms_opt(6, 0, 0).unwrap()),
            ..Default::default()
        };
        let merged = update.apply(prefs);
        assert!(!merged.in_app_likes);
        assert!(merged.in_app_follows);
        assert!(merged.quiet_hours_enabled);
        assert!(merged.quiet_hours_start.is_some());
    }
}
