//! Notification lifecycle: create, list, read-state, archive, delete.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_core::types::id::{NotificationId, UserId};
use socialhub_core::types::pagination::{PageRequest, PageResponse};
use socialhub_database::repositories::{NotificationFilter, NotificationRepository};
use socialhub_entity::notification::model::{MAX_MESSAGE_LEN, MAX_TITLE_LEN};
use socialhub_entity::notification::{
    NewNotification, Notification, NotificationKind, NotificationStats,
};

use crate::context::RequestContext;
use crate::delivery::{DeliverySink, NotificationUpdate};

/// Manages the durable notification store and pushes changes through
/// the delivery sink.
#[derive(Clone)]
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
    sink: Arc<dyn DeliverySink>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>, sink: Arc<dyn DeliverySink>) -> Self {
        Self { repo, sink }
    }

    /// Persist a notification, then push it to the recipient's live
    /// connections. Persistence is authoritative: a failed push is
    /// logged and swallowed, never unwound.
    pub async fn create(&self, new: NewNotification) -> AppResult<Notification> {
        validate_content(&new.title, &new.message)?;

        let notification = new.into_notification(Utc::now());
        self.repo.insert(&notification).await?;
        debug!(
            notification_id = %notification.id,
            recipient_id = %notification.recipient_id,
            kind = %notification.kind,
            "Notification created"
        );

        if let Err(e) = self.sink.deliver(&notification).await {
            warn!(
                notification_id = %notification.id,
                error = %e,
                "Live delivery failed; notification remains stored"
            );
        }
        Ok(notification)
    }

    /// Create a system notification with no sender.
    pub async fn create_system(
        &self,
        recipient_id: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
        payload: Value,
    ) -> AppResult<Notification> {
        self.create(NewNotification {
            recipient_id,
            sender: None,
            kind: NotificationKind::System,
            title: title.into(),
            message: message.into(),
            subject: None,
            payload,
        })
        .await
    }

    /// List the current user's notifications, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        self.repo.list(ctx.user_id, filter, page).await
    }

    /// Admin-only listing across all recipients.
    pub async fn list_all(
        &self,
        ctx: &RequestContext,
        recipient_id: Option<UserId>,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden("Admin role required"));
        }
        self.repo.list_all(recipient_id, filter, page).await
    }

    /// Fetch a single notification. Admins may fetch any record;
    /// everyone else only their own.
    pub async fn get(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<Notification> {
        let notification = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))?;
        if notification.recipient_id != ctx.user_id && !ctx.is_admin() {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(notification)
    }

    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.repo.count_unread(ctx.user_id).await
    }

    pub async fn stats(&self, ctx: &RequestContext) -> AppResult<NotificationStats> {
        self.repo.stats(ctx.user_id).await
    }

    /// Mark one of the current user's notifications read. Repeated
    /// calls succeed; the original read_at is kept and the update frame
    /// carries the stored timestamp, never a fresh one.
    pub async fn mark_read(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<()> {
        let effective = self
            .repo
            .mark_read(id, ctx.user_id, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))?;
        self.push_update(ctx.user_id, id, &NotificationUpdate::read(effective))
            .await;
        Ok(())
    }

    /// Mark all of the current user's unread notifications read,
    /// returning how many changed.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let read_at = Utc::now();
        let changed = self.repo.mark_all_read(ctx.user_id, read_at).await?;
        let update = NotificationUpdate::read(read_at);
        for id in &changed {
            self.push_update(ctx.user_id, *id, &update).await;
        }
        Ok(changed.len() as u64)
    }

    /// Archive or unarchive one of the current user's notifications.
    pub async fn set_archived(
        &self,
        ctx: &RequestContext,
        id: NotificationId,
        archived: bool,
    ) -> AppResult<()> {
        if !self.repo.set_archived(id, ctx.user_id, archived).await? {
            return Err(AppError::not_found("Notification not found"));
        }
        self.push_update(ctx.user_id, id, &NotificationUpdate::archived(archived))
            .await;
        Ok(())
    }

    /// Delete a notification. Admins may delete any record; everyone
    /// else only their own.
    pub async fn delete(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<()> {
        let owner = if ctx.is_admin() {
            None
        } else {
            Some(ctx.user_id)
        };
        if !self.repo.delete(id, owner).await? {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    async fn push_update(&self, recipient: UserId, id: NotificationId, update: &NotificationUpdate) {
        if let Err(e) = self.sink.deliver_update(recipient, id, update).await {
            warn!(notification_id = %id, error = %e, "Live update delivery failed");
        }
    }
}

fn validate_content(title: &str, message: &str) -> AppResult<()> {
    if title.is_empty() {
        return Err(AppError::validation("Title must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if message.is_empty() {
        return Err(AppError::validation("Message must not be empty"));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::validation(format!(
            "Message must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use socialhub_core::ErrorKind;
    use socialhub_database::memory::MemoryNotificationRepository;
    use socialhub_entity::user::UserRole;

    use super::*;

    /// Records every delivery; optionally fails all of them.
    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<NotificationId>>,
        updates: Mutex<Vec<(NotificationId, NotificationUpdate)>>,
        fail: bool,
    }

    #[async_trait]
    impl DeliverySink for RecordingSink {
        async fn deliver(&self, notification: &Notification) -> AppResult<()> {
            if self.fail {
                return Err(AppError::internal("sink down"));
            }
            self.delivered.lock().await.push(notification.id);
            Ok(())
        }

        async fn deliver_update(
            &self,
            _recipient_id: UserId,
            notification_id: NotificationId,
            update: &NotificationUpdate,
        ) -> AppResult<()> {
            self.updates
                .lock()
                .await
                .push((notification_id, update.clone()));
            Ok(())
        }
    }

    fn ctx(user_id: UserId) -> RequestContext {
        RequestContext::new(user_id, UserRole::Member, "tester".into())
    }

    fn new_notification(recipient: UserId) -> NewNotification {
        NewNotification {
            recipient_id: recipient,
            sender: None,
            kind: NotificationKind::System,
            title: "Welcome".into(),
            message: "Welcome to SocialHub".into(),
            subject: None,
            payload: Value::Null,
        }
    }

    fn service(sink: Arc<RecordingSink>) -> NotificationService {
        NotificationService::new(Arc::new(MemoryNotificationRepository::new()), sink)
    }

    #[tokio::test]
    async fn test_create_dispatches_exactly_once() {
        let sink = Arc::new(RecordingSink::default());
        let svc = service(sink.clone());
        let n = svc.create(new_notification(UserId::new())).await.unwrap();
        assert_eq!(*sink.delivered.lock().await, vec![n.id]);
    }

    #[tokio::test]
    async fn test_create_survives_sink_failure() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let svc = service(sink);
        let user = UserId::new();
        let n = svc.create(new_notification(user)).await.unwrap();
        assert!(!n.is_read);
        assert_eq!(svc.unread_count(&ctx(user)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_oversized_title() {
        let svc = service(Arc::new(RecordingSink::default()));
        let mut new = new_notification(UserId::new());
        new.title = "t".repeat(101);
        let err = svc.create(new).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_mark_read_idempotent_and_pushes_update() {
        let sink = Arc::new(RecordingSink::default());
        let svc = service(sink.clone());
        let user = UserId::new();
        let n = svc.create(new_notification(user)).await.unwrap();

        svc.mark_read(&ctx(user), n.id).await.unwrap();
        svc.mark_read(&ctx(user), n.id).await.unwrap();

        let updates = sink.updates.lock().await;
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].0, n.id);
        assert_eq!(updates[0].1.is_read, Some(true));
        // Both frames carry the stored read_at, so live-synced clients
        // agree with what a later fetch would return.
        assert_eq!(updates[1].1.read_at, updates[0].1.read_at);
        let stored = svc.get(&ctx(user), n.id).await.unwrap();
        assert_eq!(stored.read_at, updates[0].1.read_at);
    }

    #[tokio::test]
    async fn test_mark_read_unknown_id_is_not_found() {
        let svc = service(Arc::new(RecordingSink::default()));
        let err = svc
            .mark_read(&ctx(UserId::new()), NotificationId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_mark_all_read_pushes_one_update_per_changed_row() {
        let sink = Arc::new(RecordingSink::default());
        let svc = service(sink.clone());
        let user = UserId::new();
        svc.create(new_notification(user)).await.unwrap();
        svc.create(new_notification(user)).await.unwrap();

        assert_eq!(svc.mark_all_read(&ctx(user)).await.unwrap(), 2);
        assert_eq!(sink.updates.lock().await.len(), 2);
        assert_eq!(svc.mark_all_read(&ctx(user)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_all_requires_admin() {
        let svc = service(Arc::new(RecordingSink::default()));
        let err = svc
            .list_all(
                &ctx(UserId::new()),
                None,
                &NotificationFilter::default(),
                &PageRequest::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let admin = RequestContext::new(UserId::new(), UserRole::Admin, "root".into());
        assert!(svc
            .list_all(
                &admin,
                None,
                &NotificationFilter::default(),
                &PageRequest::default()
            )
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_get_hides_other_users_notifications() {
        let svc = service(Arc::new(RecordingSink::default()));
        let owner = UserId::new();
        let n = svc.create(new_notification(owner)).await.unwrap();

        assert_eq!(svc.get(&ctx(owner), n.id).await.unwrap().id, n.id);

        let err = svc.get(&ctx(UserId::new()), n.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let admin = RequestContext::new(UserId::new(), UserRole::Admin, "root".into());
        assert!(svc.get(&admin, n.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_admin_bypasses_ownership() {
        let svc = service(Arc::new(RecordingSink::default()));
        let owner = UserId::new();
        let n = svc.create(new_notification(owner)).await.unwrap();

        let err = svc.delete(&ctx(UserId::new()), n.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let admin = RequestContext::new(UserId::new(), UserRole::Admin, "root".into());
        svc.delete(&admin, n.id).await.unwrap();
    }
}
