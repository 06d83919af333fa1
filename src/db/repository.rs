//! User repository for NetLink.
//!
//! This module provides CRUD operations for users and their connections.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::types::Json;
use sqlx::QueryBuilder;

use super::user::{NewUser, User, UserSummary, UserUpdate};
use super::DbPool;
use crate::{NetlinkError, Result};

const USER_COLUMNS: &str = "id, name, username, email, password, profile_picture,
    profile_picture_id, banner_img, banner_img_id, headline, location, about, skills,
    experience, education, created_at, updated_at";

const SUMMARY_COLUMNS: &str = "id, name, username, profile_picture, headline";

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// A duplicate username or email surfaces as [`NetlinkError::Conflict`].
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (name, username, email, password, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_user.name)
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| NetlinkError::NotFound("user".to_string()))
    }

    /// Get a user by ID, including connections.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        self.with_connections(user).await
    }

    /// Get a user by exact username, including connections.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        self.with_connections(user).await
    }

    async fn with_connections(&self, user: Option<User>) -> Result<Option<User>> {
        match user {
            Some(mut user) => {
                user.connections = self.connection_ids(user.id).await?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Check if an email address is already registered.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
            .bind(email)
            .fetch_one(self.pool)
            .await?;
        Ok(exists)
    }

    /// Check if a username is already taken.
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
                .bind(username)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Update a user by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated user, or None if not found.
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE users SET ");
        let mut separated = query.separated(", ");

        if let Some(ref name) = update.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(ref username) = update.username {
            separated.push("username = ");
            separated.push_bind_unseparated(username);
        }
        if let Some(ref email) = update.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email);
        }
        if let Some(ref headline) = update.headline {
            separated.push("headline = ");
            separated.push_bind_unseparated(headline);
        }
        if let Some(ref location) = update.location {
            separated.push("location = ");
            separated.push_bind_unseparated(location);
        }
        if let Some(ref about) = update.about {
            separated.push("about = ");
            separated.push_bind_unseparated(about);
        }
        if let Some(ref image) = update.profile_picture {
            separated.push("profile_picture = ");
            separated.push_bind_unseparated(&image.url);
            separated.push("profile_picture_id = ");
            separated.push_bind_unseparated(&image.id);
        }
        if let Some(ref image) = update.banner_img {
            separated.push("banner_img = ");
            separated.push_bind_unseparated(&image.url);
            separated.push("banner_img_id = ");
            separated.push_bind_unseparated(&image.id);
        }
        if let Some(ref skills) = update.skills {
            separated.push("skills = ");
            separated.push_bind_unseparated(Json(skills.clone()));
        }
        if let Some(ref experience) = update.experience {
            separated.push("experience = ");
            separated.push_bind_unseparated(Json(experience.clone()));
        }
        if let Some(ref education) = update.education {
            separated.push("education = ");
            separated.push_bind_unseparated(Json(education.clone()));
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// IDs of the users connected to `user_id`.
    pub async fn connection_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT connection_id FROM user_connections WHERE user_id = ? ORDER BY connection_id",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(ids)
    }

    /// Connect two users in both directions.
    ///
    /// Connecting an existing pair is a no-op.
    pub async fn connect(&self, user_id: i64, other_id: i64) -> Result<()> {
        if user_id == other_id {
            return Err(NetlinkError::Validation(
                "cannot connect a user to themselves".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        for (a, b) in [(user_id, other_id), (other_id, user_id)] {
            sqlx::query(
                "INSERT OR IGNORE INTO user_connections (user_id, connection_id) VALUES (?, ?)",
            )
            .bind(a)
            .bind(b)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Users who are neither `user_id` nor connected to them.
    pub async fn list_suggestions(&self, user_id: i64, limit: i64) -> Result<Vec<UserSummary>> {
        let users = sqlx::query_as::<_, UserSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM users
             WHERE id <> ?
               AND id NOT IN (SELECT connection_id FROM user_connections WHERE user_id = ?)
             ORDER BY id
             LIMIT ?"
        ))
        .bind(user_id)
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(users)
    }

    /// Public summaries for the given IDs, keyed by ID.
    ///
    /// Unknown IDs are simply absent from the map.
    pub async fn summaries_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, UserSummary>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new(format!("SELECT {SUMMARY_COLUMNS} FROM users WHERE id IN ("));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let users = query
            .build_query_as::<UserSummary>()
            .fetch_all(self.pool)
            .await?;

        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
