//! User profile management for NetLink.
//!
//! This module provides public profile lookup, connection suggestions and
//! profile updates for the acting user.

use tracing::info;

use super::validation::{validate_email, validate_name, validate_username};
use crate::db::{
    Database, Education, Experience, ProfileImage, User, UserRepository, UserSummary, UserUpdate,
};
use crate::media::{self, ImageStore};
use crate::{NetlinkError, Result};

/// Maximum number of suggested connections.
pub const SUGGESTION_LIMIT: i64 = 3;

/// Maximum length for headline, location and about texts.
pub const MAX_PROFILE_TEXT_LENGTH: usize = 1000;

/// Profile update request. `None` leaves a field untouched.
///
/// `profile_picture` and `banner_img` hold image data URIs; an empty string
/// clears the image.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub about: Option<String>,
    pub profile_picture: Option<String>,
    pub banner_img: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<Vec<Experience>>,
    pub education: Option<Vec<Education>>,
}

impl ProfileUpdateRequest {
    fn validate(&self) -> Result<()> {
        if let Some(ref name) = self.name {
            validate_name(name)?;
        }
        if let Some(ref username) = self.username {
            validate_username(username)?;
        }
        if let Some(ref email) = self.email {
            validate_email(email)?;
        }
        for (field, value) in [
            ("headline", &self.headline),
            ("location", &self.location),
            ("about", &self.about),
        ] {
            if let Some(text) = value {
                if text.chars().count() > MAX_PROFILE_TEXT_LENGTH {
                    return Err(NetlinkError::Validation(format!(
                        "{field} must be at most {MAX_PROFILE_TEXT_LENGTH} characters"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Service for profile operations.
pub struct ProfileService<'a> {
    db: &'a Database,
    images: &'a dyn ImageStore,
}

impl<'a> ProfileService<'a> {
    /// Create a new ProfileService.
    pub fn new(db: &'a Database, images: &'a dyn ImageStore) -> Self {
        Self { db, images }
    }

    /// Up to three users who are neither the user nor already connected.
    pub async fn suggestions(&self, user: &User) -> Result<Vec<UserSummary>> {
        UserRepository::new(self.db.pool())
            .list_suggestions(user.id, SUGGESTION_LIMIT)
            .await
    }

    /// Look up a profile by username.
    pub async fn public_profile(&self, username: &str) -> Result<User> {
        UserRepository::new(self.db.pool())
            .get_by_username(username)
            .await?
            .ok_or_else(|| NetlinkError::NotFound("User".to_string()))
    }

    /// Update the user's own profile.
    ///
    /// Images are uploaded after validation and uniqueness checks pass, and
    /// their URLs are stored in place of the data URIs.
    pub async fn update_profile(&self, user: &User, request: ProfileUpdateRequest) -> Result<User> {
        request.validate()?;

        let repo = UserRepository::new(self.db.pool());
        if let Some(ref username) = request.username {
            if username != &user.username && repo.username_exists(username).await? {
                return Err(NetlinkError::Conflict("Username already taken".to_string()));
            }
        }
        if let Some(ref email) = request.email {
            if email != &user.email && repo.email_exists(email).await? {
                return Err(NetlinkError::Conflict("Email already in use".to_string()));
            }
        }

        let profile_picture = self.upload_if_present(request.profile_picture).await?;
        let banner_img = match self.upload_if_present(request.banner_img).await {
            Ok(image) => image,
            Err(e) => {
                self.discard_new(profile_picture.as_ref()).await;
                return Err(e);
            }
        };

        let update = UserUpdate {
            name: request.name.map(|n| n.trim().to_string()),
            username: request.username,
            email: request.email,
            headline: request.headline,
            location: request.location,
            about: request.about,
            profile_picture,
            banner_img,
            skills: request.skills,
            experience: request.experience,
            education: request.education,
        };

        let updated = match repo.update(user.id, &update).await {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                self.discard_uploads(&update).await;
                return Err(NetlinkError::NotFound("User".to_string()));
            }
            Err(e) => {
                self.discard_uploads(&update).await;
                return Err(e);
            }
        };

        // The replaced files are no longer referenced
        if update.profile_picture.is_some() {
            self.discard_old(user.profile_picture_id.as_deref()).await;
        }
        if update.banner_img.is_some() {
            self.discard_old(user.banner_img_id.as_deref()).await;
        }

        info!("User {} updated their profile", updated.id);
        Ok(updated)
    }

    /// Upload a data URI. An empty string clears the image.
    async fn upload_if_present(&self, image: Option<String>) -> Result<Option<ProfileImage>> {
        match image {
            Some(data) if !data.trim().is_empty() => {
                let stored = self.images.upload(&data).await?;
                Ok(Some(ProfileImage {
                    url: stored.url,
                    id: Some(stored.id),
                }))
            }
            Some(_) => Ok(Some(ProfileImage::default())),
            None => Ok(None),
        }
    }

    async fn discard_uploads(&self, update: &UserUpdate) {
        self.discard_new(update.profile_picture.as_ref()).await;
        self.discard_new(update.banner_img.as_ref()).await;
    }

    async fn discard_new(&self, image: Option<&ProfileImage>) {
        self.discard_old(image.and_then(|i| i.id.as_deref())).await;
    }

    async fn discard_old(&self, id: Option<&str>) {
        if let Some(id) = id {
            media::discard(self.images, id).await;
        }
    }
}
