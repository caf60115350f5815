//! Notification kind enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use socialhub_core::AppError;

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Someone started following the recipient.
    Follow,
    /// Someone liked the recipient's post.
    Like,
    /// Someone commented on the recipient's post.
    Comment,
    /// Someone mentioned the recipient in a comment.
    Mention,
    /// System-generated notification (no sender).
    System,
}

impl NotificationKind {
    /// All kinds, in stats-reporting order.
    pub const ALL: [NotificationKind; 5] = [
        Self::Follow,
        Self::Like,
        Self::Comment,
        Self::Mention,
        Self::System,
    ];

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Mention => "mention",
            Self::System => "system",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "follow" => Ok(Self::Follow),
            "like" => Ok(Self::Like),
            "comment" => Ok(Self::Comment),
            "mention" => Ok(Self::Mention),
            "system" => Ok(Self::System),
            _ => Err(AppError::validation(format!(
                "Invalid notification kind: '{s}'. Expected one of: follow, like, comment, mention, system"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_kinds() {
        for kind in NotificationKind::ALL {
            let parsed: NotificationKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = "poke".parse::<NotificationKind>().unwrap_err();
        assert_eq!(err.kind, socialhub_core::ErrorKind::Validation);
    }
}
