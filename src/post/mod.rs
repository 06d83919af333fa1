//! Posts for NetLink.
//!
//! This module provides:
//! - Post, comment and like storage
//! - The connection feed
//! - Post creation and deletion with image handling
//! - Comments and like toggling with author notifications

mod engagement;
mod repository;
mod service;
mod types;

pub use engagement::{EngagementService, LikeChange};
pub use repository::PostRepository;
pub use service::{PostService, MAX_CONTENT_LENGTH};
pub use types::{Comment, CommentDetails, NewPost, Post, PostDetails, PostSummary};
