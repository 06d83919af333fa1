//! Notification service for NetLink.

use std::collections::BTreeSet;

use super::repository::NotificationRepository;
use super::types::NotificationDetails;
use crate::db::{Database, User, UserRepository};
use crate::post::PostRepository;
use crate::Result;

/// Service for reading notifications.
pub struct NotificationService<'a> {
    db: &'a Database,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// The user's notifications, newest first, with related user and post.
    pub async fn list_for_user(&self, user: &User) -> Result<Vec<NotificationDetails>> {
        let notifications = NotificationRepository::new(self.db.pool())
            .list_for_recipient(user.id)
            .await?;

        let user_ids: Vec<i64> = notifications
            .iter()
            .map(|n| n.related_user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let post_ids: Vec<i64> = notifications
            .iter()
            .filter_map(|n| n.related_post_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let users = UserRepository::new(self.db.pool())
            .summaries_by_ids(&user_ids)
            .await?;
        let posts = PostRepository::new(self.db.pool())
            .summaries_by_ids(&post_ids)
            .await?;

        Ok(notifications
            .into_iter()
            .map(|notification| NotificationDetails {
                related_user: users.get(&notification.related_user_id).cloned(),
                related_post: notification
                    .related_post_id
                    .and_then(|id| posts.get(&id).cloned()),
                notification,
            })
            .collect())
    }
}
