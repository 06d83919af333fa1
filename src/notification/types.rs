//! Notification models for NetLink.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::db::UserSummary;
use crate::post::PostSummary;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// Someone liked the recipient's post.
    Like,
    /// Someone commented on the recipient's post.
    Comment,
    /// Someone accepted the recipient's connection request.
    ConnectionAccepted,
}

impl NotificationType {
    /// Get the stored string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Like => "like",
            NotificationType::Comment => "comment",
            NotificationType::ConnectionAccepted => "connectionAccepted",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(NotificationType::Like),
            "comment" => Ok(NotificationType::Comment),
            "connectionAccepted" => Ok(NotificationType::ConnectionAccepted),
            _ => Err(format!("unknown notification type: {s}")),
        }
    }
}

/// Notification entity.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: i64,
    pub recipient_id: i64,
    pub kind: NotificationType,
    /// The user who triggered the notification.
    pub related_user_id: i64,
    /// The post involved, if any. Cleared when the post is deleted.
    pub related_post_id: Option<i64>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: i64,
    pub kind: NotificationType,
    pub related_user_id: i64,
    pub related_post_id: Option<i64>,
}

impl NewNotification {
    /// A notification about a post.
    pub fn for_post(
        kind: NotificationType,
        recipient_id: i64,
        related_user_id: i64,
        post_id: i64,
    ) -> Self {
        Self {
            recipient_id,
            kind,
            related_user_id,
            related_post_id: Some(post_id),
        }
    }
}

/// A notification with its related user and post resolved.
#[derive(Debug, Clone)]
pub struct NotificationDetails {
    pub notification: Notification,
    pub related_user: Option<UserSummary>,
    pub related_post: Option<PostSummary>,
}
