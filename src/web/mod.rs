//! REST API for NetLink.
//!
//! Routes live under `/api/v1`. Sessions travel in an HTTP-only cookie that
//! the [`middleware::require_auth`] layer resolves to a user.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
