//! CORS middleware configuration.

use axum::http::header::{ACCEPT, CONTENT_TYPE, COOKIE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;

/// Create a CORS layer for the web client.
///
/// The session travels in a cookie, so credentials are always allowed and
/// origins must be explicit. When no origins are configured, the client URL
/// is the only allowed origin.
pub fn create_cors_layer(origins: &[String], client_url: &str) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let mut allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    if allowed.is_empty() {
        if let Ok(origin) = client_url.trim_end_matches('/').parse() {
            allowed.push(origin);
        }
    }

    CorsLayer::new()
        .allow_methods(methods)
        .allow_headers([CONTENT_TYPE, ACCEPT, COOKIE])
        .allow_credentials(true)
        .allow_origin(allowed)
}
