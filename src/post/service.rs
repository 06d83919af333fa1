//! Post service for NetLink.
//!
//! Feed, creation, deletion and retrieval of posts, with authorization
//! checks and image handling.

use std::collections::BTreeSet;

use tracing::{info, warn};

use super::repository::PostRepository;
use super::types::{CommentDetails, NewPost, Post, PostDetails};
use crate::db::{Database, DbPool, User, UserRepository};
use crate::media::{self, ImageStore};
use crate::{NetlinkError, Result};

/// Maximum length for post content (in characters).
pub const MAX_CONTENT_LENGTH: usize = 10_000;

/// Validate post or comment content.
pub(crate) fn validate_content(content: &str, what: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(NetlinkError::Validation(format!("{what} is required")));
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(NetlinkError::Validation(format!(
            "{what} must be at most {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Resolve authors and comment authors for a batch of posts.
pub(crate) async fn enrich_posts(pool: &DbPool, posts: Vec<Post>) -> Result<Vec<PostDetails>> {
    let user_ids: BTreeSet<i64> = posts
        .iter()
        .flat_map(|p| std::iter::once(p.author_id).chain(p.comments.iter().map(|c| c.user_id)))
        .collect();
    let ids: Vec<i64> = user_ids.into_iter().collect();
    let users = UserRepository::new(pool).summaries_by_ids(&ids).await?;

    Ok(posts
        .into_iter()
        .map(|mut post| {
            let comments = std::mem::take(&mut post.comments)
                .into_iter()
                .map(|comment| CommentDetails {
                    user: users.get(&comment.user_id).cloned(),
                    comment,
                })
                .collect();
            PostDetails {
                author: users.get(&post.author_id).cloned(),
                comments,
                post,
            }
        })
        .collect())
}

/// Fetch a single post enriched, or NotFound.
pub(crate) async fn load_post_details(pool: &DbPool, post_id: i64) -> Result<PostDetails> {
    let post = PostRepository::new(pool)
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| NetlinkError::NotFound("Post".to_string()))?;
    let mut details = enrich_posts(pool, vec![post]).await?;
    details
        .pop()
        .ok_or_else(|| NetlinkError::NotFound("Post".to_string()))
}

/// Service for post operations.
pub struct PostService<'a> {
    db: &'a Database,
    images: &'a dyn ImageStore,
}

impl<'a> PostService<'a> {
    /// Create a new PostService.
    pub fn new(db: &'a Database, images: &'a dyn ImageStore) -> Self {
        Self { db, images }
    }

    /// Posts by the user's connections, newest first.
    pub async fn feed(&self, user: &User) -> Result<Vec<PostDetails>> {
        let posts = PostRepository::new(self.db.pool()).list_feed(user.id).await?;
        enrich_posts(self.db.pool(), posts).await
    }

    /// Create a post, uploading the image first if one is given.
    pub async fn create_post(
        &self,
        user: &User,
        content: &str,
        image: Option<&str>,
    ) -> Result<PostDetails> {
        validate_content(content, "content")?;

        let mut new_post = NewPost::new(user.id, content);
        if let Some(data) = image.filter(|d| !d.trim().is_empty()) {
            let stored = self.images.upload(data).await?;
            new_post = new_post.with_image(stored.url, stored.id);
        }

        let post = match PostRepository::new(self.db.pool()).create(&new_post).await {
            Ok(post) => post,
            Err(e) => {
                if let Some(image_id) = &new_post.image_id {
                    media::discard(self.images, image_id).await;
                }
                return Err(e);
            }
        };
        info!("User {} created post {}", user.id, post.id);

        load_post_details(self.db.pool(), post.id).await
    }

    /// Delete a post written by `user`.
    ///
    /// The stored image is removed first; failing to remove it does not stop
    /// the post from being deleted.
    pub async fn delete_post(&self, user: &User, post_id: i64) -> Result<()> {
        let repo = PostRepository::new(self.db.pool());
        let post = repo
            .get_by_id(post_id)
            .await?
            .ok_or_else(|| NetlinkError::NotFound("Post".to_string()))?;

        if !post.is_authored_by(user.id) {
            return Err(NetlinkError::Permission(
                "You are not authorized to delete this post".to_string(),
            ));
        }

        if let Some(image_id) = &post.image_id {
            match self.images.delete(image_id).await {
                Ok(true) => {}
                Ok(false) => warn!("Image {} of post {} was already gone", image_id, post.id),
                Err(e) => warn!("Failed to delete image {} of post {}: {}", image_id, post.id, e),
            }
        }

        repo.delete(post.id).await?;
        info!("User {} deleted post {}", user.id, post.id);
        Ok(())
    }

    /// Get a single post.
    pub async fn get_post(&self, post_id: i64) -> Result<PostDetails> {
        load_post_details(self.db.pool(), post_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewUser;
    use crate::media::LocalImageStore;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use tempfile::TempDir;

    struct Fixture {
        db: Database,
        images: LocalImageStore,
        dir: TempDir,
        alice: User,
        bob: User,
    }

    async fn setup() -> Fixture {
        let db = Database::open_in_memory().await.unwrap();
        let dir = TempDir::new().unwrap();
        let images = LocalImageStore::new(dir.path(), "http://localhost/images", 1).unwrap();
        let users = UserRepository::new(db.pool());
        let alice = users
            .create(&NewUser::new("Alice", "alice", "alice@example.com", "pw"))
            .await
            .unwrap();
        let bob = users
            .create(&NewUser::new("Bob", "bob", "bob@example.com", "pw"))
            .await
            .unwrap();
        users.connect(alice.id, bob.id).await.unwrap();
        let alice = users.get_by_id(alice.id).await.unwrap().unwrap();
        let bob = users.get_by_id(bob.id).await.unwrap().unwrap();
        Fixture {
            db,
            images,
            dir,
            alice,
            bob,
        }
    }

    fn png() -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(b"pixels"))
    }

    #[tokio::test]
    async fn test_create_post_text_only() {
        let f = setup().await;
        let service = PostService::new(&f.db, &f.images);

        let details = service.create_post(&f.alice, "hello", None).await.unwrap();

        assert_eq!(details.post.content, "hello");
        assert!(details.post.image_url.is_none());
        assert_eq!(details.author.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_create_post_empty_content() {
        let f = setup().await;
        let service = PostService::new(&f.db, &f.images);

        let result = service.create_post(&f.alice, "   ", None).await;
        assert!(matches!(result, Err(NetlinkError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_post_with_image() {
        let f = setup().await;
        let service = PostService::new(&f.db, &f.images);

        let details = service
            .create_post(&f.alice, "pic", Some(&png()))
            .await
            .unwrap();

        let image_id = details.post.image_id.clone().unwrap();
        assert!(f.images.file_path(&image_id).unwrap().exists());
        assert!(details.post.image_url.unwrap().ends_with(&image_id));
    }

    #[tokio::test]
    async fn test_create_post_failure_discards_image() {
        let f = setup().await;
        let service = PostService::new(&f.db, &f.images);
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(f.alice.id)
            .execute(f.db.pool())
            .await
            .unwrap();

        let result = service.create_post(&f.alice, "pic", Some(&png())).await;

        assert!(matches!(result, Err(NetlinkError::Database(_))));
        let leftover = std::fs::read_dir(f.dir.path())
            .unwrap()
            .filter_map(|entry| std::fs::read_dir(entry.unwrap().path()).ok())
            .flatten()
            .count();
        assert_eq!(leftover, 0);
    }

    #[tokio::test]
    async fn test_delete_by_non_author_is_forbidden() {
        let f = setup().await;
        let service = PostService::new(&f.db, &f.images);
        let details = service
            .create_post(&f.alice, "pic", Some(&png()))
            .await
            .unwrap();
        let image_id = details.post.image_id.clone().unwrap();

        let result = service.delete_post(&f.bob, details.post.id).await;

        assert!(matches!(result, Err(NetlinkError::Permission(_))));
        assert!(service.get_post(details.post.id).await.is_ok());
        assert!(f.images.file_path(&image_id).unwrap().exists());
    }

    #[tokio::test]
    async fn test_delete_removes_post_and_image() {
        let f = setup().await;
        let service = PostService::new(&f.db, &f.images);
        let details = service
            .create_post(&f.alice, "pic", Some(&png()))
            .await
            .unwrap();
        let image_id = details.post.image_id.clone().unwrap();

        service.delete_post(&f.alice, details.post.id).await.unwrap();

        assert!(matches!(
            service.get_post(details.post.id).await,
            Err(NetlinkError::NotFound(_))
        ));
        assert!(!f.images.file_path(&image_id).unwrap().exists());
    }

    #[tokio::test]
    async fn test_delete_survives_missing_image() {
        let f = setup().await;
        let service = PostService::new(&f.db, &f.images);
        let details = service
            .create_post(&f.alice, "pic", Some(&png()))
            .await
            .unwrap();
        let image_id = details.post.image_id.clone().unwrap();
        std::fs::remove_file(f.images.file_path(&image_id).unwrap()).unwrap();

        assert!(service.delete_post(&f.alice, details.post.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_post() {
        let f = setup().await;
        let service = PostService::new(&f.db, &f.images);

        let result = service.delete_post(&f.alice, 999).await;
        assert!(matches!(result, Err(NetlinkError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_feed() {
        let f = setup().await;
        let service = PostService::new(&f.db, &f.images);
        service.create_post(&f.bob, "from bob", None).await.unwrap();
        service.create_post(&f.alice, "from alice", None).await.unwrap();

        let feed = service.feed(&f.alice).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].post.content, "from bob");
        assert_eq!(feed[0].author.as_ref().unwrap().name, "Bob");
    }

    #[tokio::test]
    async fn test_feed_without_connections_is_empty() {
        let f = setup().await;
        let users = UserRepository::new(f.db.pool());
        let loner = users
            .create(&NewUser::new("Loner", "loner", "loner@example.com", "pw"))
            .await
            .unwrap();
        let service = PostService::new(&f.db, &f.images);
        service.create_post(&f.alice, "hello", None).await.unwrap();

        assert!(service.feed(&loner).await.unwrap().is_empty());
    }
}
