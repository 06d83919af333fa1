//! Post repository for NetLink.
//!
//! This module provides CRUD operations for posts, likes and comments.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::sqlite::SqliteExecutor;
use sqlx::QueryBuilder;

use super::types::{Comment, NewPost, Post, PostSummary};
use crate::db::DbPool;
use crate::{NetlinkError, Result};

const POST_COLUMNS: &str = "id, author_id, content, image_url, image_id, created_at, updated_at";

/// Repository for post CRUD operations.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post.
    ///
    /// Returns the created post with the assigned ID.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (author_id, content, image_url, image_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(new_post.author_id)
        .bind(&new_post.content)
        .bind(&new_post.image_url)
        .bind(&new_post.image_id)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| NetlinkError::NotFound("Post".to_string()))
    }

    /// Get a post by ID, with likes and comments.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match post {
            Some(post) => {
                let mut posts = vec![post];
                self.load_engagement(&mut posts).await?;
                Ok(posts.pop())
            }
            None => Ok(None),
        }
    }

    /// Delete a post by ID.
    ///
    /// Likes and comments go with it. Returns true if a post was deleted.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Posts written by the connections of `user_id`, newest first.
    pub async fn list_feed(&self, user_id: i64) -> Result<Vec<Post>> {
        let mut posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts
             WHERE author_id IN (SELECT connection_id FROM user_connections WHERE user_id = ?)
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        self.load_engagement(&mut posts).await?;
        Ok(posts)
    }

    /// Fill in likes and comments for a batch of posts.
    async fn load_engagement(&self, posts: &mut [Post]) -> Result<()> {
        if posts.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(
            "SELECT post_id, user_id FROM post_likes WHERE post_id IN (",
        );
        let mut separated = query.separated(", ");
        for id in &ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY created_at, user_id");
        let likes: Vec<(i64, i64)> = query.build_query_as().fetch_all(self.pool).await?;

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(
            "SELECT id, post_id, user_id, content, created_at FROM post_comments WHERE post_id IN (",
        );
        let mut separated = query.separated(", ");
        for id in &ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id");
        let comments: Vec<Comment> = query.build_query_as().fetch_all(self.pool).await?;

        let mut by_id: HashMap<i64, &mut Post> = posts.iter_mut().map(|p| (p.id, p)).collect();
        for (post_id, user_id) in likes {
            if let Some(post) = by_id.get_mut(&post_id) {
                post.likes.push(user_id);
            }
        }
        for comment in comments {
            if let Some(post) = by_id.get_mut(&comment.post_id) {
                post.comments.push(comment);
            }
        }

        Ok(())
    }

    /// Record a like if absent.
    ///
    /// Takes any executor so it can run inside a transaction. Returns true
    /// only if this call inserted the like.
    pub async fn add_like<'e, E>(executor: E, post_id: i64, user_id: i64) -> Result<bool>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO post_likes (post_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Remove a like if present.
    ///
    /// Returns true only if this call removed the like.
    pub async fn remove_like<'e, E>(executor: E, post_id: i64, user_id: i64) -> Result<bool>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Append a comment to a post.
    pub async fn add_comment<'e, E>(
        executor: E,
        post_id: i64,
        user_id: i64,
        content: &str,
    ) -> Result<Comment>
    where
        E: SqliteExecutor<'e>,
    {
        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO post_comments (post_id, user_id, content, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING id, post_id, user_id, content, created_at",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;
        Ok(comment)
    }

    /// Short summaries for the given post IDs, keyed by ID.
    pub async fn summaries_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, PostSummary>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new("SELECT id, content, image_url AS image FROM posts WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let posts = query
            .build_query_as::<PostSummary>()
            .fetch_all(self.pool)
            .await?;

        Ok(posts.into_iter().map(|p| (p.id, p)).collect())
    }
}
