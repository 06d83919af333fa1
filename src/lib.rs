//! NetLink - a professional social networking backend.
//!
//! Accounts with cookie sessions, profiles and connections, posts with
//! comments and likes, and pull-based notifications behind a REST API.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod mail;
pub mod media;
pub mod notification;
pub mod post;
pub mod web;

pub use auth::{AuthService, ProfileService, Session, SessionTokens, SignupRequest};
pub use config::Config;
pub use db::{Database, User, UserRepository, UserSummary};
pub use error::{NetlinkError, Result};
pub use notification::{NotificationService, NotificationType};
pub use post::{EngagementService, PostService};
