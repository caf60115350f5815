//! Subject reference: a typed pointer to the entity a notification is
//! about.
//!
//! A closed tagged union over the referenceable entity kinds. This is a
//! loose pointer, never an ownership relation: deleting the subject does
//! not delete the notification.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use socialhub_core::AppResult;
use socialhub_core::types::id::{CommentId, PostId};

/// A typed reference to the entity that originated a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum SubjectRef {
    /// The notification concerns a post.
    Post(PostId),
    /// The notification concerns a comment.
    Comment(CommentId),
}

impl SubjectRef {
    /// The entity kind as a storage string.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Post(_) => "post",
            Self::Comment(_) => "comment",
        }
    }

    /// The referenced entity's raw UUID.
    pub fn id_uuid(&self) -> Uuid {
        match self {
            Self::Post(id) => id.into_uuid(),
            Self::Comment(id) => id.into_uuid(),
        }
    }

    /// Reassemble from the storage `(kind, id)` column pair.
    pub fn from_columns(kind: &str, id: Uuid) -> AppResult<Self> {
        match kind {
            "post" => Ok(Self::Post(PostId::from_uuid(id))),
            "comment" => Ok(Self::Comment(CommentId::from_uuid(id))),
            _ => Err(socialhub_core::AppError::validation(format!(
                "Invalid subject kind: '{kind}'. Expected one of: post, comment"
            ))),
        }
    }
}
