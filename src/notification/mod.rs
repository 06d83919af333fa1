//! Notifications for NetLink.
//!
//! Notifications are created as a side effect of likes and comments and are
//! read by their recipient. Delivery is pull-based.

mod repository;
mod service;
mod types;

pub use repository::NotificationRepository;
pub use service::NotificationService;
pub use types::{NewNotification, Notification, NotificationDetails, NotificationType};
