//! Request DTOs for Web API.
//!
//! Every request type rejects unknown keys, so a body with fields outside the
//! allowlist fails deserialization with a 400.

use serde::Deserialize;
use validator::Validate;

use crate::auth::{ProfileUpdateRequest, SignupRequest as SignupData};
use crate::db::{Education, Experience};

use super::validation::{no_control_chars, not_empty_trimmed};

/// Signup request.
///
/// Missing fields default to empty strings so they are reported as
/// validation failures rather than as malformed JSON.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct SignupRequest {
    /// Display name.
    #[validate(length(min = 3, max = 50, message = "Name must be 3-50 characters"))]
    pub name: String,
    /// Username.
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl From<SignupRequest> for SignupData {
    fn from(req: SignupRequest) -> Self {
        SignupData::new(req.name, req.username, req.email, req.password)
    }
}

/// Login request.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct LoginRequest {
    /// Username.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Partial profile update. Absent keys leave the field unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 50, message = "Name must be 3-50 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(custom(function = "no_control_chars"))]
    pub headline: Option<String>,
    #[validate(custom(function = "no_control_chars"))]
    pub location: Option<String>,
    pub about: Option<String>,
    /// Image data URI; an empty string clears the picture.
    pub profile_picture: Option<String>,
    /// Image data URI; an empty string clears the banner.
    pub banner_img: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<Vec<Experience>>,
    pub education: Option<Vec<Education>>,
}

impl From<UpdateProfileRequest> for ProfileUpdateRequest {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileUpdateRequest {
            name: req.name,
            username: req.username,
            email: req.email,
            headline: req.headline,
            location: req.location,
            about: req.about,
            profile_picture: req.profile_picture,
            banner_img: req.banner_img,
            skills: req.skills,
            experience: req.experience,
            education: req.education,
        }
    }
}

/// Create post request.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct CreatePostRequest {
    /// Post body.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub content: String,
    /// Optional image data URI.
    pub image: Option<String>,
}

/// Comment request.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct CommentRequest {
    /// Comment body. Emptiness is checked after the post lookup.
    pub content: String,
}
