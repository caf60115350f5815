//! In-memory notification store.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use socialhub_core::result::AppResult;
use socialhub_core::types::id::{NotificationId, UserId};
use socialhub_core::types::pagination::{PageRequest, PageResponse};
use socialhub_entity::notification::{Notification, NotificationStats};

use crate::repositories::{NotificationFilter, NotificationRepository};

/// Notification store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryNotificationRepository {
    items: RwLock<Vec<Notification>>,
}

impl MemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(n: &Notification, recipient_id: Option<UserId>, filter: &NotificationFilter) -> bool {
        if let Some(recipient) = recipient_id {
            if n.recipient_id != recipient {
                return false;
            }
        }
        if let Some(is_read) = filter.is_read {
            if n.is_read != is_read {
                return false;
            }
        }
        if let Some(is_archived) = filter.is_archived {
            if n.is_archived != is_archived {
                return false;
            }
        }
        if let Some(kind) = filter.kind {
            if n.kind != kind {
                return false;
            }
        }
        true
    }

    async fn select(
        &self,
        recipient_id: Option<UserId>,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> PageResponse<Notification> {
        let items = self.items.read().await;
        let mut selected: Vec<Notification> = items
            .iter()
            .filter(|n| Self::matches(n, recipient_id, filter))
            .cloned()
            .collect();
        // Same ordering as the SQL store: newest first, id breaks ties.
        selected.sort_by_key(|n| Reverse((n.created_at, n.id.into_uuid())));
        PageResponse::from_sequence(selected, page)
    }
}

#[async_trait]
impl NotificationRepository for MemoryNotificationRepository {
    async fn insert(&self, notification: &Notification) -> AppResult<()> {
        self.items.write().await.push(notification.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|n| n.id == id).cloned())
    }

    async fn list(
        &self,
        recipient_id: UserId,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        Ok(self.select(Some(recipient_id), filter, page).await)
    }

    async fn list_all(
        &self,
        recipient_id: Option<UserId>,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        Ok(self.select(recipient_id, filter, page).await)
    }

    async fn count_unread(&self, recipient_id: UserId) -> AppResult<u64> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
            .count() as u64)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        recipient_id: UserId,
        read_at: DateTime<Utc>,
    ) -> AppResult<Option<DateTime<Utc>>> {
        let mut items = self.items.write().await;
        match items
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == recipient_id)
        {
            Some(n) => {
                n.is_read = true;
                Ok(Some(*n.read_at.get_or_insert(read_at)))
            }
            None => Ok(None),
        }
    }

    async fn mark_all_read(
        &self,
        recipient_id: UserId,
        read_at: DateTime<Utc>,
    ) -> AppResult<Vec<NotificationId>> {
        let mut items = self.items.write().await;
        let mut changed = Vec::new();
        for n in items
            .iter_mut()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
        {
            n.is_read = true;
            n.read_at = Some(read_at);
            changed.push(n.id);
        }
        Ok(changed)
    }

    async fn set_archived(
        &self,
        id: NotificationId,
        recipient_id: UserId,
        archived: bool,
    ) -> AppResult<bool> {
        let mut items = self.items.write().await;
        match items
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == recipient_id)
        {
            Some(n) => {
                n.is_archived = archived;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: NotificationId, recipient_id: Option<UserId>) -> AppResult<bool> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|n| {
            !(n.id == id && recipient_id.is_none_or(|recipient| n.recipient_id == recipient))
        });
        Ok(items.len() < before)
    }

    async fn stats(&self, recipient_id: UserId) -> AppResult<NotificationStats> {
        use socialhub_entity::notification::NotificationKind::*;

        let items = self.items.read().await;
        let mut stats = NotificationStats::default();
        for n in items.iter().filter(|n| n.recipient_id == recipient_id) {
            stats.total_notifications += 1;
            if n.is_read {
                stats.read_count += 1;
            } else {
                stats.unread_count += 1;
            }
            if n.is_archived {
                stats.archived_count += 1;
            }
            match n.kind {
                Follow => stats.follow_count += 1,
                Like => stats.like_count += 1,
                Comment => stats.comment_count += 1,
                Mention => stats.mention_count += 1,
                System => stats.system_count += 1,
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::Value;

    use socialhub_entity::notification::{NewNotification, NotificationKind};

    use super::*;

    fn notification(recipient: UserId, kind: NotificationKind, age_secs: i64) -> Notification {
        NewNotification {
            recipient_id: recipient,
            sender: None,
            kind,
            title: "t".into(),
            message: "m".into(),
            subject: None,
            payload: Value::Null,
        }
        .into_notification(Utc::now() - Duration::seconds(age_secs))
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = MemoryNotificationRepository::new();
        let user = UserId::new();
        let old = notification(user, NotificationKind::Like, 60);
        let new = notification(user, NotificationKind::Follow, 0);
        repo.insert(&old).await.unwrap();
        repo.insert(&new).await.unwrap();

        let page = repo
            .list(user, &NotificationFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.items[0].id, new.id);
        assert_eq!(page.items[1].id, old.id);
        assert_eq!(page.total_items, 2);
    }

    #[tokio::test]
    async fn test_mark_read_first_write_wins() {
        let repo = MemoryNotificationRepository::new();
        let user = UserId::new();
        let n = notification(user, NotificationKind::Like, 0);
        repo.insert(&n).await.unwrap();

        let first = Utc::now();
        assert_eq!(repo.mark_read(n.id, user, first).await.unwrap(), Some(first));
        let later = first + Duration::seconds(30);
        // The repeat call reports the original timestamp, not the new one.
        assert_eq!(repo.mark_read(n.id, user, later).await.unwrap(), Some(first));

        let stored = repo.find_by_id(n.id).await.unwrap().unwrap();
        assert!(stored.is_read);
        assert_eq!(stored.read_at, Some(first));
    }

    #[tokio::test]
    async fn test_mark_read_wrong_recipient() {
        let repo = MemoryNotificationRepository::new();
        let n = notification(UserId::new(), NotificationKind::Like, 0);
        repo.insert(&n).await.unwrap();
        assert!(repo
            .mark_read(n.id, UserId::new(), Utc::now())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_mark_all_read_counts_changed_rows() {
        let repo = MemoryNotificationRepository::new();
        let user = UserId::new();
        for i in 0..3 {
            repo.insert(&notification(user, NotificationKind::Comment, i))
                .await
                .unwrap();
        }
        let read = notification(user, NotificationKind::Like, 10);
        repo.insert(&read).await.unwrap();
        repo.mark_read(read.id, user, Utc::now()).await.unwrap();

        assert_eq!(repo.mark_all_read(user, Utc::now()).await.unwrap().len(), 3);
        assert_eq!(repo.count_unread(user).await.unwrap(), 0);
        // A second pass changes nothing.
        assert!(repo.mark_all_read(user, Utc::now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filters_compose() {
        let repo = MemoryNotificationRepository::new();
        let user = UserId::new();
        let like = notification(user, NotificationKind::Like, 0);
        let follow = notification(user, NotificationKind::Follow, 1);
        repo.insert(&like).await.unwrap();
        repo.insert(&follow).await.unwrap();
        repo.set_archived(follow.id, user, true).await.unwrap();

        let filter = NotificationFilter {
            is_archived: Some(false),
            ..Default::default()
        };
        let page = repo
            .list(user, &filter, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, like.id);

        let filter = NotificationFilter {
            kind: Some(NotificationKind::Follow),
            ..Default::default()
        };
        let page = repo
            .list(user, &filter, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, follow.id);
    }

    #[tokio::test]
    async fn test_delete_enforces_ownership_unless_admin() {
        let repo = MemoryNotificationRepository::new();
        let owner = UserId::new();
        let n = notification(owner, NotificationKind::System, 0);
        repo.insert(&n).await.unwrap();

        assert!(!repo.delete(n.id, Some(UserId::new())).await.unwrap());
        assert!(repo.delete(n.id, None).await.unwrap());
        assert!(repo.find_by_id(n.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stats_buckets() {
        let repo = MemoryNotificationRepository::new();
        let user = UserId::new();
        let like = notification(user, NotificationKind::Like, 0);
        repo.insert(&like).await.unwrap();
        repo.insert(&notification(user, NotificationKind::Mention, 1))
            .await
            .unwrap();
        repo.mark_read(like.id, user, Utc::now()).await.unwrap();
        repo.set_archived(like.id, user, true).await.unwrap();

        let stats = repo.stats(user).await.unwrap();
        assert_eq!(stats.total_notifications, 2);
        assert_eq!(stats.read_count, 1);
        assert_eq!(stats.unread_count, 1);
        assert_eq!(stats.archived_count, 1);
        assert_eq!(stats.like_count, 1);
        assert_eq!(stats.mention_count, 1);
        assert_eq!(stats.follow_count, 0);
    }
}
