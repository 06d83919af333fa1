//! Response DTOs for Web API.
//!
//! Field names are camelCase on the wire. Timestamps are RFC 3339 strings.

use serde::Serialize;

use crate::db::{Education, Experience, User, UserSummary};
use crate::notification::NotificationDetails;
use crate::post::{CommentDetails, PostDetails, PostSummary};

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Message-only response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// User DTOs
// ============================================================================

/// Full user profile. Never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub profile_picture: String,
    pub banner_img: String,
    pub headline: String,
    pub location: String,
    pub about: String,
    pub skills: Vec<String>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    /// IDs of connected users.
    pub connections: Vec<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            profile_picture: user.profile_picture,
            banner_img: user.banner_img,
            headline: user.headline,
            location: user.location,
            about: user.about,
            skills: user.skills.0,
            experience: user.experience.0,
            education: user.education.0,
            connections: user.connections,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Post DTOs
// ============================================================================

/// Comment author as shown under a post.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    pub id: i64,
    pub name: String,
    pub profile_picture: String,
}

impl From<UserSummary> for CommentAuthor {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            name: user.name,
            profile_picture: user.profile_picture,
        }
    }
}

/// Comment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub content: String,
    /// Comment author, or null if the account no longer resolves.
    pub user: Option<CommentAuthor>,
    pub created_at: String,
}

impl From<CommentDetails> for CommentResponse {
    fn from(details: CommentDetails) -> Self {
        Self {
            id: details.comment.id,
            content: details.comment.content,
            user: details.user.map(CommentAuthor::from),
            created_at: details.comment.created_at.to_rfc3339(),
        }
    }
}

/// Post response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    /// Author summary.
    pub author: Option<UserSummary>,
    pub content: String,
    /// Image URL (absent when the post has no image).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// IDs of users who liked the post.
    pub likes: Vec<i64>,
    pub comments: Vec<CommentResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PostDetails> for PostResponse {
    fn from(details: PostDetails) -> Self {
        let post = details.post;
        Self {
            id: post.id,
            author: details.author,
            content: post.content,
            image: post.image_url,
            likes: post.likes,
            comments: details
                .comments
                .into_iter()
                .map(CommentResponse::from)
                .collect(),
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Notification DTOs
// ============================================================================

/// Actor shown on a notification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationUser {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub profile_picture: String,
}

/// Post shown on a notification.
#[derive(Debug, Serialize)]
pub struct NotificationPost {
    pub id: i64,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<PostSummary> for NotificationPost {
    fn from(post: PostSummary) -> Self {
        Self {
            id: post.id,
            content: post.content,
            image: post.image,
        }
    }
}

/// Notification response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: i64,
    pub recipient: i64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub related_user: Option<NotificationUser>,
    /// Null when the notification has no post or the post was deleted.
    pub related_post: Option<NotificationPost>,
    pub read: bool,
    pub created_at: String,
}

impl From<NotificationDetails> for NotificationResponse {
    fn from(details: NotificationDetails) -> Self {
        let notification = details.notification;
        Self {
            id: notification.id,
            recipient: notification.recipient_id,
            kind: notification.kind.as_str(),
            related_user: details.related_user.map(|u| NotificationUser {
                id: u.id,
                name: u.name,
                username: u.username,
                profile_picture: u.profile_picture,
            }),
            related_post: details.related_post.map(NotificationPost::from),
            read: notification.read,
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::{Comment, Post};
    use chrono::Utc;

    fn summary() -> UserSummary {
        UserSummary {
            id: 2,
            name: "Bob Smith".to_string(),
            username: "bob".to_string(),
            profile_picture: String::new(),
            headline: "NetLink User".to_string(),
        }
    }

    fn post(image_url: Option<&str>) -> Post {
        Post {
            id: 10,
            author_id: 1,
            content: "hello".to_string(),
            image_url: image_url.map(str::to_string),
            image_id: image_url.map(|_| "ab.png".to_string()),
            likes: vec![2],
            comments: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_post_response_omits_missing_image() {
        let response = PostResponse::from(PostDetails {
            post: post(None),
            author: Some(summary()),
            comments: vec![],
        });
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("image").is_none());
        assert_eq!(json["likes"], serde_json::json!([2]));
        assert_eq!(json["author"]["profilePicture"], "");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_post_response_with_image_and_comment() {
        let now = Utc::now();
        let response = PostResponse::from(PostDetails {
            post: post(Some("http://localhost/images/ab/ab.png")),
            author: None,
            comments: vec![CommentDetails {
                comment: Comment {
                    id: 1,
                    post_id: 10,
                    user_id: 2,
                    content: "nice".to_string(),
                    created_at: now,
                },
                user: Some(summary()),
            }],
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["image"], "http://localhost/images/ab/ab.png");
        assert_eq!(json["comments"][0]["user"]["name"], "Bob Smith");
        // Comment authors only carry id, name and picture
        assert!(json["comments"][0]["user"].get("username").is_none());
    }

    #[test]
    fn test_notification_response_type_key() {
        use crate::notification::{Notification, NotificationType};

        let response = NotificationResponse::from(NotificationDetails {
            notification: Notification {
                id: 1,
                recipient_id: 1,
                kind: NotificationType::Like,
                related_user_id: 2,
                related_post_id: None,
                read: false,
                created_at: Utc::now(),
            },
            related_user: Some(summary()),
            related_post: None,
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["type"], "like");
        assert_eq!(json["relatedUser"]["username"], "bob");
        assert!(json["relatedPost"].is_null());
        assert_eq!(json["read"], false);
    }
}
