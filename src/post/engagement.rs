//! Likes and comments.

use std::sync::Arc;

use tracing::{debug, info};

use super::repository::PostRepository;
use super::service::{load_post_details, validate_content};
use super::types::PostDetails;
use crate::db::{Database, User, UserRepository};
use crate::mail::{self, templates, ClientLinks, Mailer};
use crate::notification::{NewNotification, NotificationRepository, NotificationType};
use crate::{NetlinkError, Result};

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeChange {
    Liked,
    Unliked,
}

/// Service for commenting on and liking posts.
pub struct EngagementService<'a> {
    db: &'a Database,
    mailer: Arc<dyn Mailer>,
    links: &'a ClientLinks,
}

impl<'a> EngagementService<'a> {
    /// Create a new EngagementService.
    pub fn new(db: &'a Database, mailer: Arc<dyn Mailer>, links: &'a ClientLinks) -> Self {
        Self { db, mailer, links }
    }

    /// Comment on a post.
    ///
    /// Notifies and emails the author unless they are the commenter. The
    /// comment and its notification are written in one transaction.
    pub async fn create_comment(
        &self,
        user: &User,
        post_id: i64,
        content: &str,
    ) -> Result<PostDetails> {
        let post = PostRepository::new(self.db.pool())
            .get_by_id(post_id)
            .await?
            .ok_or_else(|| NetlinkError::NotFound("Post".to_string()))?;
        validate_content(content, "comment")?;

        let author = if post.is_authored_by(user.id) {
            None
        } else {
            UserRepository::new(self.db.pool())
                .get_by_id(post.author_id)
                .await?
        };

        let mut tx = self.db.begin().await?;
        PostRepository::add_comment(&mut *tx, post.id, user.id, content).await?;
        if !post.is_authored_by(user.id) {
            NotificationRepository::create(
                &mut *tx,
                &NewNotification::for_post(
                    NotificationType::Comment,
                    post.author_id,
                    user.id,
                    post.id,
                ),
            )
            .await?;
        }
        tx.commit().await?;
        debug!("User {} commented on post {}", user.id, post.id);

        if let Some(author) = author {
            let message = templates::comment_notification(
                &author.email,
                &author.name,
                &user.name,
                &self.links.post(post.id),
                content,
            );
            mail::spawn_send(Arc::clone(&self.mailer), message);
        }

        load_post_details(self.db.pool(), post.id).await
    }

    /// Toggle the user's like on a post.
    ///
    /// A like that actually lands, by someone other than the author, creates
    /// a notification in the same transaction. A like row that already exists
    /// is left alone and notifies nobody.
    pub async fn toggle_like(&self, user: &User, post_id: i64) -> Result<(LikeChange, PostDetails)> {
        let post = PostRepository::new(self.db.pool())
            .get_by_id(post_id)
            .await?
            .ok_or_else(|| NetlinkError::NotFound("Post".to_string()))?;

        let mut tx = self.db.begin().await?;
        let change = if PostRepository::remove_like(&mut *tx, post.id, user.id).await? {
            LikeChange::Unliked
        } else {
            if PostRepository::add_like(&mut *tx, post.id, user.id).await?
                && !post.is_authored_by(user.id)
            {
                NotificationRepository::create(
                    &mut *tx,
                    &NewNotification::for_post(
                        NotificationType::Like,
                        post.author_id,
                        user.id,
                        post.id,
                    ),
                )
                .await?;
            }
            LikeChange::Liked
        };
        tx.commit().await?;
        info!("User {} {:?} post {}", user.id, change, post.id);

        let details = load_post_details(self.db.pool(), post.id).await?;
        Ok((change, details))
    }
}
