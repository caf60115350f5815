//! PostgreSQL notification repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use socialhub_core::error::{AppError, ErrorKind};
use socialhub_core::result::AppResult;
use socialhub_core::types::id::{NotificationId, UserId};
use socialhub_core::types::pagination::{PageRequest, PageResponse};
use socialhub_entity::notification::{Notification, NotificationStats};

use super::{NotificationFilter, NotificationRepository};

/// Notification store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Filter predicates use the "NULL bind matches everything" pattern so
// the SQL stays static.
const FILTER_CLAUSE: &str = "($2::boolean IS NULL OR is_read = $2) \
     AND ($3::boolean IS NULL OR is_archived = $3) \
     AND ($4::text IS NULL OR kind = $4)";

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert(&self, notification: &Notification) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO notifications \
             (id, recipient_id, sender_id, sender_username, kind, title, message, \
              subject_kind, subject_id, payload, is_read, is_archived, created_at, read_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(notification.id)
        .bind(notification.recipient_id)
        .bind(notification.sender_id)
        .bind(&notification.sender_username)
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.subject.as_ref().map(|s| s.kind_str()))
        .bind(notification.subject.as_ref().map(|s| s.id_uuid()))
        .bind(&notification.payload)
        .bind(notification.is_read)
        .bind(notification.is_archived)
        .bind(notification.created_at)
        .bind(notification.read_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert notification", e)
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load notification", e)
            })
    }

    async fn list(
        &self,
        recipient_id: UserId,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let kind = filter.kind.map(|k| k.as_str());

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND {FILTER_CLAUSE}"
        ))
        .bind(recipient_id)
        .bind(filter.is_read)
        .bind(filter.is_archived)
        .bind(kind)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
        })?;

        let items = sqlx::query_as::<_, Notification>(&format!(
            "SELECT * FROM notifications WHERE recipient_id = $1 AND {FILTER_CLAUSE} \
             ORDER BY created_at DESC, id DESC LIMIT $5 OFFSET $6"
        ))
        .bind(recipient_id)
        .bind(filter.is_read)
        .bind(filter.is_archived)
        .bind(kind)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
        })?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn list_all(
        &self,
        recipient_id: Option<UserId>,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let kind = filter.kind.map(|k| k.as_str());

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM notifications \
             WHERE ($1::uuid IS NULL OR recipient_id = $1) AND {FILTER_CLAUSE}"
        ))
        .bind(recipient_id)
        .bind(filter.is_read)
        .bind(filter.is_archived)
        .bind(kind)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
        })?;

        let items = sqlx::query_as::<_, Notification>(&format!(
            "SELECT * FROM notifications \
             WHERE ($1::uuid IS NULL OR recipient_id = $1) AND {FILTER_CLAUSE} \
             ORDER BY created_at DESC, id DESC LIMIT $5 OFFSET $6"
        ))
        .bind(recipient_id)
        .bind(filter.is_read)
        .bind(filter.is_archived)
        .bind(kind)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
        })?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn count_unread(&self, recipient_id: UserId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))?;
        Ok(count as u64)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        recipient_id: UserId,
        read_at: DateTime<Utc>,
    ) -> AppResult<Option<DateTime<Utc>>> {
        // COALESCE keeps the original read_at on repeat calls; the
        // RETURNING clause hands back whichever timestamp won.
        sqlx::query_scalar::<_, DateTime<Utc>>(
            "UPDATE notifications SET is_read = TRUE, read_at = COALESCE(read_at, $3) \
             WHERE id = $1 AND recipient_id = $2 RETURNING read_at",
        )
        .bind(id)
        .bind(recipient_id)
        .bind(read_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))
    }

    async fn mark_all_read(
        &self,
        recipient_id: UserId,
        read_at: DateTime<Utc>,
    ) -> AppResult<Vec<NotificationId>> {
        sqlx::query_scalar::<_, NotificationId>(
            "UPDATE notifications SET is_read = TRUE, read_at = $2 \
             WHERE recipient_id = $1 AND is_read = FALSE RETURNING id",
        )
        .bind(recipient_id)
        .bind(read_at)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))
    }

    async fn set_archived(
        &self,
        id: NotificationId,
        recipient_id: UserId,
        archived: bool,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_archived = $3 WHERE id = $1 AND recipient_id = $2",
        )
        .bind(id)
        .bind(recipient_id)
        .bind(archived)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set archived", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: NotificationId, recipient_id: Option<UserId>) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE id = $1 AND ($2::uuid IS NULL OR recipient_id = $2)",
        )
        .bind(id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self, recipient_id: UserId) -> AppResult<NotificationStats> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE is_read = FALSE) AS unread, \
                    COUNT(*) FILTER (WHERE is_read = TRUE) AS read, \
                    COUNT(*) FILTER (WHERE is_archived = TRUE) AS archived, \
                    COUNT(*) FILTER (WHERE kind = 'follow') AS follows, \
                    COUNT(*) FILTER (WHERE kind = 'like') AS likes, \
                    COUNT(*) FILTER (WHERE kind = 'comment') AS comments, \
                    COUNT(*) FILTER (WHERE kind = 'mention') AS mentions, \
                    COUNT(*) FILTER (WHERE kind = 'system') AS system \
             FROM notifications WHERE recipient_id = $1",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load stats", e))?;

        let get = |name: &str| -> AppResult<u64> {
            row.try_get::<i64, _>(name)
                .map(|v| v as u64)
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to decode stats", e))
        };

        Ok(NotificationStats {
            total_notifications: get("total")?,
            unread_count: get("unread")?,
            read_count: get("read")?,
            archived_count: get("archived")?,
            follow_count: get("follows")?,
            like_count: get("likes")?,
            comment_count: get("comments")?,
            mention_count: get("mentions")?,
            system_count: get("system")?,
        })
    }
}
