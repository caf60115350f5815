//! Per-user delivery preference management.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_core::types::id::UserId;
use socialhub_database::repositories::PreferenceRepository;
use socialhub_entity::notification::{DeliveryChannel, NotificationKind, NotificationPreference};

/// Manages per-user delivery preferences and answers gating queries.
#[derive(Clone)]
pub struct PreferenceService {
    repo: Arc<dyn PreferenceRepository>,
}

impl PreferenceService {
    pub fn new(repo: Arc<dyn PreferenceRepository>) -> Self {
        Self { repo }
    }

    /// Load a user's preferences, materializing the all-enabled default
    /// row on first access.
    pub async fn get_or_create(&self, user_id: UserId) -> AppResult<NotificationPreference> {
        if let Some(prefs) = self.repo.find_by_user(user_id).await? {
            return Ok(prefs);
        }
        let prefs = NotificationPreference::default_for_user(user_id);
        self.repo.upsert(&prefs).await?;
        Ok(prefs)
    }

    /// Replace a user's preferences. The caller may only write its own
    /// row; the stored user_id always comes from the argument.
    pub async fn save(
        &self,
        user_id: UserId,
        mut prefs: NotificationPreference,
    ) -> AppResult<NotificationPreference> {
        if prefs.quiet_hours_enabled
            && (prefs.quiet_hours_start.is_none() || prefs.quiet_hours_end.is_none())
        {
            return Err(AppError::validation(
                "Quiet hours require both a start and an end time",
            ));
        }
        prefs.user_id = user_id;
        prefs.updated_at = Utc::now();
        self.repo.upsert(&prefs).await?;
        Ok(prefs)
    }

    /// Whether a live in-app push is allowed for this recipient right
    /// now. Consulted by the dispatcher only; persistence is never
    /// gated.
    pub async fn allows_live_push(
        &self,
        user_id: UserId,
        kind: NotificationKind,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let prefs = self.get_or_create(user_id).await?;
        Ok(prefs.is_enabled(kind, DeliveryChannel::InApp) && !prefs.in_quiet_hours(now.time()))
    }
}
