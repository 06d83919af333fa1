//! Router configuration for Web API.

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::error::ApiError;
use super::handlers::{
    check_auth, create_comment, create_post, delete_post, get_feed, get_notifications, get_post,
    get_public_profile, get_suggestions, like_post, login, logout, signup, update_profile,
    AppState,
};
use super::middleware::{auth_rate_limit, create_cors_layer, require_auth, RateLimitState};
use crate::config::Config;

/// Create the `/api/v1` router.
pub fn create_api_router(state: Arc<AppState>, rate_limit: Arc<RateLimitState>) -> Router<Arc<AppState>> {
    // Credential endpoints share a per-IP budget
    let credential_routes = Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route_layer(middleware::from_fn_with_state(rate_limit, auth_rate_limit));

    let public_routes = Router::new().route("/auth/logout", post(logout));

    let protected_routes = Router::new()
        .route("/auth/check-auth", get(check_auth))
        .route("/users/suggestions", get(get_suggestions))
        .route("/users/profile", patch(update_profile))
        .route("/users/:username", get(get_public_profile))
        .route("/posts", get(get_feed))
        .route("/posts/create", post(create_post))
        .route("/posts/delete/:id", delete(delete_post))
        .route("/posts/:id", get(get_post).post(get_post))
        .route("/posts/:id/comment", post(create_comment))
        .route("/posts/:id/like", post(like_post))
        .route("/notifications", get(get_notifications))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .merge(credential_routes)
        .merge(public_routes)
        .merge(protected_routes)
}

/// Create the full application router.
///
/// Serves the API under `/api/v1`, stored images under `/images` and a
/// health check at `/health`.
pub fn create_router(
    state: Arc<AppState>,
    rate_limit: Arc<RateLimitState>,
    config: &Config,
    images_dir: &Path,
) -> Router {
    Router::new()
        .nest("/api/v1", create_api_router(state.clone(), rate_limit))
        .route("/health", get(health_check))
        .nest_service("/images", ServeDir::new(images_dir))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(
                    &config.web.cors_origins,
                    &config.server.client_url,
                )),
        )
        .with_state(state)
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
