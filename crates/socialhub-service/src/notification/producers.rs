//! Domain-event producers.
//!
//! Translates social-graph events into notification records, applying
//! the suppression rules: no self-notifications, and no mention
//! notification for a recipient already covered by the comment
//! notification on their own post.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use socialhub_core::events::DomainEvent;
use socialhub_core::result::AppResult;
use socialhub_core::types::id::{CommentId, PostId, UserId};
use socialhub_database::repositories::UserRepository;
use socialhub_entity::notification::{NewNotification, Notification, NotificationKind, SubjectRef};

use super::excerpt::excerpt;
use super::mention::extract_mentions;
use super::service::NotificationService;

/// Turns domain events into persisted notifications.
#[derive(Clone)]
pub struct EventProducers {
    notifications: Arc<NotificationService>,
    users: Arc<dyn UserRepository>,
}

impl EventProducers {
    pub fn new(notifications: Arc<NotificationService>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            notifications,
            users,
        }
    }

    /// Process one event, returning every notification it produced.
    pub async fn handle(&self, event: DomainEvent) -> AppResult<Vec<Notification>> {
        debug!(event = event.name(), "Processing domain event");
        match event {
            DomainEvent::FollowCreated {
                follower_id,
                follower_username,
                followed_id,
            } => {
                self.on_follow(follower_id, follower_username, followed_id)
                    .await
            }
            DomainEvent::LikeCreated {
                liker_id,
                liker_username,
                post_id,
                post_author_id,
                post_content,
            } => {
                self.on_like(liker_id, liker_username, post_id, post_author_id, &post_content)
                    .await
            }
            DomainEvent::CommentCreated {
                comment_id,
                post_id,
                commenter_id,
                commenter_username,
                post_author_id,
                comment_content,
                post_content,
            } => {
                self.on_comment(
                    comment_id,
                    post_id,
                    commenter_id,
                    commenter_username,
                    post_author_id,
                    &comment_content,
                    &post_content,
                )
                .await
            }
        }
    }

    async fn on_follow(
        &self,
        follower_id: UserId,
        follower_username: String,
        followed_id: UserId,
    ) -> AppResult<Vec<Notification>> {
        if follower_id == followed_id {
            return Ok(Vec::new());
        }
        let n = self
            .notifications
            .create(NewNotification {
                recipient_id: followed_id,
                sender: Some(sender(follower_id, &follower_username)),
                kind: NotificationKind::Follow,
                title: "New Follower".into(),
                message: format!("{follower_username} started following you"),
                subject: None,
                payload: json!({
                    "follower_id": follower_id,
                    "follower_username": follower_username,
                }),
            })
            .await?;
        Ok(vec![n])
    }

    async fn on_like(
        &self,
        liker_id: UserId,
        liker_username: String,
        post_id: PostId,
        post_author_id: UserId,
        post_content: &str,
    ) -> AppResult<Vec<Notification>> {
        if liker_id == post_author_id {
            return Ok(Vec::new());
        }
        let n = self
            .notifications
            .create(NewNotification {
                recipient_id: post_author_id,
                sender: Some(sender(liker_id, &liker_username)),
                kind: NotificationKind::Like,
                title: "New Like".into(),
                message: format!("{liker_username} liked your post"),
                subject: Some(SubjectRef::Post(post_id)),
                payload: json!({
                    "post_id": post_id,
                    "post_content": excerpt(post_content),
                }),
            })
            .await?;
        Ok(vec![n])
    }

    #[allow(clippy::too_many_arguments)]
    async fn on_comment(
        &self,
        comment_id: CommentId,
        post_id: PostId,
        commenter_id: UserId,
        commenter_username: String,
        post_author_id: UserId,
        comment_content: &str,
        post_content: &str,
    ) -> AppResult<Vec<Notification>> {
        let mut produced = Vec::new();

        if commenter_id != post_author_id {
            let n = self
                .notifications
                .create(NewNotification {
                    recipient_id: post_author_id,
                    sender: Some(sender(commenter_id, &commenter_username)),
                    kind: NotificationKind::Comment,
                    title: "New Comment".into(),
                    message: format!("{commenter_username} commented on your post"),
                    subject: Some(SubjectRef::Post(post_id)),
                    payload: json!({
                        "post_id": post_id,
                        "comment_id": comment_id,
                        "comment_content": excerpt(comment_content),
                        "post_content": excerpt(post_content),
                    }),
                })
                .await?;
            produced.push(n);
        }

        for username in extract_mentions(comment_content) {
            let Some(mentioned) = self.users.find_by_username(&username).await? else {
                continue;
            };
            if !mentioned.status.is_active() {
                continue;
            }
            // Self-mentions and mentions of the post author (already
            // notified about the comment itself) are suppressed.
            if mentioned.id == commenter_id || mentioned.id == post_author_id {
                continue;
            }
            let n = self
                .notifications
                .create(NewNotification {
                    recipient_id: mentioned.id,
                    sender: Some(sender(commenter_id, &commenter_username)),
                    kind: NotificationKind::Mention,
                    title: "Mentioned in Comment".into(),
                    message: format!("{commenter_username} mentioned you in a comment"),
                    subject: Some(SubjectRef::Post(post_id)),
                    payload: json!({
                        "post_id": post_id,
                        "comment_id": comment_id,
                        "comment_content": excerpt(comment_content),
                    }),
                })
                .await?;
            produced.push(n);
        }

        Ok(produced)
    }
}

fn sender(id: UserId, username: &str) -> socialhub_entity::notification::Sender {
    socialhub_entity::notification::Sender {
        id,
        username: username.to_string(),
    }
}
