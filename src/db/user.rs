//! User model for NetLink.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// Work experience entry on a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Education entry on a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub end_year: Option<i32>,
}

/// User entity representing a registered account.
///
/// Deliberately not `Serialize`: the password hash must go through a
/// response type that leaves it out.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login username (unique).
    pub username: String,
    /// Email address (unique).
    pub email: String,
    /// Password hash (Argon2).
    pub password: String,
    /// Profile picture URL (empty if unset).
    pub profile_picture: String,
    /// Storage ID of the uploaded profile picture.
    pub profile_picture_id: Option<String>,
    /// Banner image URL (empty if unset).
    pub banner_img: String,
    /// Storage ID of the uploaded banner image.
    pub banner_img_id: Option<String>,
    pub headline: String,
    pub location: String,
    pub about: String,
    pub skills: Json<Vec<String>>,
    pub experience: Json<Vec<Experience>>,
    pub education: Json<Vec<Education>>,
    /// IDs of connected users, loaded separately from `user_connections`.
    #[sqlx(skip)]
    pub connections: Vec<i64>,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last profile modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Public-safe projection of a user used when enriching posts,
/// comments, notifications and suggestions.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub profile_picture: String,
    pub headline: String,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Login username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password hash (should be pre-hashed with Argon2).
    pub password: String,
}

impl NewUser {
    /// Create a new user with all required fields.
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// A profile image URL together with its storage ID.
///
/// The default value clears the image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileImage {
    pub url: String,
    pub id: Option<String>,
}

/// Partial update of a user's profile. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub about: Option<String>,
    pub profile_picture: Option<ProfileImage>,
    pub banner_img: Option<ProfileImage>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<Vec<Experience>>,
    pub education: Option<Vec<Education>>,
}

impl UserUpdate {
    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.headline.is_none()
            && self.location.is_none()
            && self.about.is_none()
            && self.profile_picture.is_none()
            && self.banner_img.is_none()
            && self.skills.is_none()
            && self.experience.is_none()
            && self.education.is_none()
    }
}
