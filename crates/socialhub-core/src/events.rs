//! Domain events consumed by the notification producers.
//!
//! The surrounding social domain (posts, comments, likes, follows) emits
//! one of these after a successful commit. Events carry the scalar fields
//! the producers need so that the notification core never reaches back
//! into domain storage.

use serde::{Deserialize, Serialize};

use crate::types::id::{CommentId, PostId, UserId};

/// A domain mutation that may originate notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A user started following another user.
    FollowCreated {
        /// The follower.
        follower_id: UserId,
        /// The follower's username.
        follower_username: String,
        /// The user being followed.
        followed_id: UserId,
    },
    /// A user liked a post.
    LikeCreated {
        /// The user who liked.
        liker_id: UserId,
        /// The liker's username.
        liker_username: String,
        /// The liked post.
        post_id: PostId,
        /// The post's author.
        post_author_id: UserId,
        /// The post body (excerpted into the notification payload).
        post_content: String,
    },
    /// A user commented on a post.
    CommentCreated {
        /// The new comment.
        comment_id: CommentId,
        /// The commented post.
        post_id: PostId,
        /// The comment's author.
        commenter_id: UserId,
        /// The commenter's username.
        commenter_username: String,
        /// The post's author.
        post_author_id: UserId,
        /// The comment body (scanned for mentions, excerpted into payloads).
        comment_content: String,
        /// The post body (excerpted into the comment notification payload).
        post_content: String,
    },
}

impl DomainEvent {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FollowCreated { .. } => "follow_created",
            Self::LikeCreated { .. } => "like_created",
            Self::CommentCreated { .. } => "comment_created",
        }
    }
}
