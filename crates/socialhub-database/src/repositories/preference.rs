//! PostgreSQL preference repository.

use async_trait::async_trait;
use sqlx::PgPool;

use socialhub_core::error::{AppError, ErrorKind};
use socialhub_core::result::AppResult;
use socialhub_core::types::id::UserId;
use socialhub_entity::notification::NotificationPreference;

use super::PreferenceRepository;

/// Preference store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgPreferenceRepository {
    pool: PgPool,
}

impl PgPreferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferenceRepository for PgPreferenceRepository {
    async fn find_by_user(&self, user_id: UserId) -> AppResult<Option<NotificationPreference>> {
        sqlx::query_as::<_, NotificationPreference>(
            "SELECT * FROM notification_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load preferences", e))
    }

    async fn upsert(&self, prefs: &NotificationPreference) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO notification_preferences \
             (user_id, \
              email_follows, email_likes, email_comments, email_mentions, email_system, \
              push_follows, push_likes, push_comments, push_mentions, push_system, \
              in_app_follows, in_app_likes, in_app_comments, in_app_mentions, in_app_system, \
              quiet_hours_enabled, quiet_hours_start, quiet_hours_end, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                     $17, $18, $19, $20) \
             ON CONFLICT (user_id) DO UPDATE SET \
              email_follows = EXCLUDED.email_follows, \
              email_likes = EXCLUDED.email_likes, \
              email_comments = EXCLUDED.email_comments, \
              email_mentions = EXCLUDED.email_mentions, \
              email_system = EXCLUDED.email_system, \
              push_follows = EXCLUDED.push_follows, \
              push_likes = EXCLUDED.push_likes, \
              push_comments = EXCLUDED.push_comments, \
              push_mentions = EXCLUDED.push_mentions, \
              push_system = EXCLUDED.push_system, \
              in_app_follows = EXCLUDED.in_app_follows, \
              in_app_likes = EXCLUDED.in_app_likes, \
              in_app_comments = EXCLUDED.in_app_comments, \
              in_app_mentions = EXCLUDED.in_app_mentions, \
              in_app_system = EXCLUDED.in_app_system, \
              quiet_hours_enabled = EXCLUDED.quiet_hours_enabled, \
              quiet_hours_start = EXCLUDED.quiet_hours_start, \
              quiet_hours_end = EXCLUDED.quiet_hours_end, \
              updated_at = EXCLUDED.updated_at",
        )
        .bind(prefs.user_id)
        .bind(prefs.email_follows)
        .bind(prefs.email_likes)
        .bind(prefs.email_comments)
        .bind(prefs.email_mentions)
        .bind(prefs.email_system)
        .bind(prefs.push_follows)
        .bind(prefs.push_likes)
        .bind(prefs.push_comments)
        .bind(prefs.push_mentions)
        .bind(prefs.push_system)
        .bind(prefs.in_app_follows)
        .bind(prefs.in_app_likes)
        .bind(prefs.in_app_comments)
        .bind(prefs.in_app_mentions)
        .bind(prefs.in_app_system)
        .bind(prefs.quiet_hours_enabled)
        .bind(prefs.quiet_hours_start)
        .bind(prefs.quiet_hours_end)
        .bind(prefs.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save preferences", e))?;
        Ok(())
    }
}
