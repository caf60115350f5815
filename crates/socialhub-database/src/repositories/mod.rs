//! Repository traits and their PostgreSQL implementations.
//!
//! Every store operation goes through a trait object so services and
//! handlers can be exercised against the in-memory implementations in
//! [`crate::memory`] without a running database.

pub mod notification;
pub mod preference;
pub mod user;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use socialhub_core::result::AppResult;
use socialhub_core::types::id::{NotificationId, UserId};
use socialhub_core::types::pagination::{PageRequest, PageResponse};
use socialhub_entity::notification::{
    Notification, NotificationKind, NotificationPreference, NotificationStats,
};
use socialhub_entity::user::User;

pub use notification::PgNotificationRepository;
pub use preference::PgPreferenceRepository;
pub use user::PgUserRepository;

/// Optional predicates applied when listing notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationFilter {
    pub is_read: Option<bool>,
    pub is_archived: Option<bool>,
    pub kind: Option<NotificationKind>,
}

/// Durable notification store.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a new notification record.
    async fn insert(&self, notification: &Notification) -> AppResult<()>;

    async fn find_by_id(&self, id: NotificationId) -> AppResult<Option<Notification>>;

    /// List one recipient's notifications, newest first.
    async fn list(
        &self,
        recipient_id: UserId,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Admin listing across all recipients, newest first. An explicit
    /// recipient narrows the result.
    async fn list_all(
        &self,
        recipient_id: Option<UserId>,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    async fn count_unread(&self, recipient_id: UserId) -> AppResult<u64>;

    /// Mark one notification read. The first read wins: `read_at` is
    /// never overwritten. Returns the effective `read_at` stored on the
    /// row, or `None` when no row matches the (id, recipient) pair.
    async fn mark_read(
        &self,
        id: NotificationId,
        recipient_id: UserId,
        read_at: DateTime<Utc>,
    ) -> AppResult<Option<DateTime<Utc>>>;

    /// Mark every unread notification read, returning the ids that
    /// changed.
    async fn mark_all_read(
        &self,
        recipient_id: UserId,
        read_at: DateTime<Utc>,
    ) -> AppResult<Vec<NotificationId>>;

    /// Archive or unarchive. Returns false when no row matches.
    async fn set_archived(
        &self,
        id: NotificationId,
        recipient_id: UserId,
        archived: bool,
    ) -> AppResult<bool>;

    /// Delete a notification. A recipient of `None` skips the ownership
    /// check (admin path). Returns false when no row matches.
    async fn delete(&self, id: NotificationId, recipient_id: Option<UserId>) -> AppResult<bool>;

    /// Aggregate per-recipient counts across status and kind.
    async fn stats(&self, recipient_id: UserId) -> AppResult<NotificationStats>;
}

/// Store for per-user delivery preferences.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    async fn find_by_user(&self, user_id: UserId) -> AppResult<Option<NotificationPreference>>;

    /// Insert or fully replace a user's preference row.
    async fn upsert(&self, prefs: &NotificationPreference) -> AppResult<()>;
}

/// Read access to user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
}
