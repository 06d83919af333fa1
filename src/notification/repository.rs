//! Notification repository for NetLink.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteExecutor;

use super::types::{NewNotification, Notification, NotificationType};
use crate::db::DbPool;
use crate::{NetlinkError, Result};

const NOTIFICATION_COLUMNS: &str =
    "id, recipient_id, type, related_user_id, related_post_id, read, created_at";

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    recipient_id: i64,
    #[sqlx(rename = "type")]
    kind: String,
    related_user_id: i64,
    related_post_id: Option<i64>,
    read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = NetlinkError;

    fn try_from(row: NotificationRow) -> Result<Self> {
        let kind: NotificationType = row.kind.parse().map_err(NetlinkError::Database)?;
        Ok(Notification {
            id: row.id,
            recipient_id: row.recipient_id,
            kind,
            related_user_id: row.related_user_id,
            related_post_id: row.related_post_id,
            read: row.read,
            created_at: row.created_at,
        })
    }
}

/// Repository for notifications.
pub struct NotificationRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> NotificationRepository<'a> {
    /// Create a new NotificationRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a notification.
    ///
    /// Takes any executor so it can run inside the transaction of the action
    /// being reported. Self-notifications are rejected with a validation error.
    pub async fn create<'e, E>(executor: E, new: &NewNotification) -> Result<Notification>
    where
        E: SqliteExecutor<'e>,
    {
        if new.recipient_id == new.related_user_id {
            return Err(NetlinkError::Validation(
                "cannot notify a user about their own action".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "INSERT INTO notifications (recipient_id, type, related_user_id, related_post_id, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(new.recipient_id)
        .bind(new.kind.as_str())
        .bind(new.related_user_id)
        .bind(new.related_post_id)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;

        row.try_into()
    }

    /// Notifications for a recipient, newest first.
    pub async fn list_for_recipient(&self, recipient_id: i64) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications
             WHERE recipient_id = ?
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(recipient_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Notification::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::post::{NewPost, PostRepository};
    use crate::Database;

    async fn setup() -> (Database, i64, i64, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let users = UserRepository::new(db.pool());
        let alice = users
            .create(&NewUser::new("Alice", "alice", "alice@example.com", "pw"))
            .await
            .unwrap()
            .id;
        let bob = users
            .create(&NewUser::new("Bob", "bob", "bob@example.com", "pw"))
            .await
            .unwrap()
            .id;
        let post = PostRepository::new(db.pool())
            .create(&NewPost::new(alice, "hello"))
            .await
            .unwrap()
            .id;
        (db, alice, bob, post)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (db, alice, bob, post) = setup().await;
        let repo = NotificationRepository::new(db.pool());

        let like = NotificationRepository::create(
            db.pool(),
            &NewNotification::for_post(NotificationType::Like, alice, bob, post),
        )
        .await
        .unwrap();
        let comment = NotificationRepository::create(
            db.pool(),
            &NewNotification::for_post(NotificationType::Comment, alice, bob, post),
        )
        .await
        .unwrap();

        assert_eq!(like.kind, NotificationType::Like);
        assert!(!like.read);

        let list = repo.list_for_recipient(alice).await.unwrap();
        let ids: Vec<i64> = list.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![comment.id, like.id]);
        assert!(repo.list_for_recipient(bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_self_notification_rejected() {
        let (db, alice, _, post) = setup().await;

        let result = NotificationRepository::create(
            db.pool(),
            &NewNotification::for_post(NotificationType::Like, alice, alice, post),
        )
        .await;
        assert!(matches!(result, Err(NetlinkError::Validation(_))));
    }

    #[tokio::test]
    async fn test_post_deletion_clears_reference() {
        let (db, alice, bob, post) = setup().await;
        let repo = NotificationRepository::new(db.pool());
        NotificationRepository::create(
            db.pool(),
            &NewNotification::for_post(NotificationType::Like, alice, bob, post),
        )
        .await
        .unwrap();

        PostRepository::new(db.pool()).delete(post).await.unwrap();

        let list = repo.list_for_recipient(alice).await.unwrap();
        assert_eq!(list.len(), 1);
        assert!(list[0].related_post_id.is_none());
    }

    #[tokio::test]
    async fn test_create_in_rolled_back_transaction() {
        let (db, alice, bob, post) = setup().await;

        let mut tx = db.begin().await.unwrap();
        NotificationRepository::create(
            &mut *tx,
            &NewNotification::for_post(NotificationType::Like, alice, bob, post),
        )
        .await
        .unwrap();
        tx.rollback().await.unwrap();

        let repo = NotificationRepository::new(db.pool());
        assert!(repo.list_for_recipient(alice).await.unwrap().is_empty());
    }
}
