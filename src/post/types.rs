//! Post and comment models for NetLink.

use chrono::{DateTime, Utc};

use crate::db::UserSummary;

/// Post entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// ID of the user who wrote the post.
    pub author_id: i64,
    /// Post body.
    pub content: String,
    /// Public URL of the attached image.
    pub image_url: Option<String>,
    /// Storage ID of the attached image, used to delete it with the post.
    pub image_id: Option<String>,
    /// IDs of users who like this post.
    #[sqlx(skip)]
    pub likes: Vec<i64>,
    /// Comments, oldest first.
    #[sqlx(skip)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Check if the given user wrote this post.
    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    /// ID of the commenter.
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i64,
    pub content: String,
    pub image_url: Option<String>,
    pub image_id: Option<String>,
}

impl NewPost {
    /// Create a text-only post.
    pub fn new(author_id: i64, content: impl Into<String>) -> Self {
        Self {
            author_id,
            content: content.into(),
            image_url: None,
            image_id: None,
        }
    }

    /// Attach a stored image.
    pub fn with_image(mut self, url: impl Into<String>, id: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self.image_id = Some(id.into());
        self
    }
}

/// Short projection of a post, used by notifications.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PostSummary {
    pub id: i64,
    pub content: String,
    pub image: Option<String>,
}

/// A comment together with its author.
#[derive(Debug, Clone)]
pub struct CommentDetails {
    pub comment: Comment,
    /// `None` if the author no longer exists.
    pub user: Option<UserSummary>,
}

/// A post with its author and comment authors resolved.
#[derive(Debug, Clone)]
pub struct PostDetails {
    pub post: Post,
    /// `None` if the author no longer exists.
    pub author: Option<UserSummary>,
    pub comments: Vec<CommentDetails>,
}
