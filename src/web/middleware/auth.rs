//! Session cookie authentication middleware.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::db::User;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Message for requests without a session cookie.
pub const NO_TOKEN_MESSAGE: &str = "Unauthorized - No token provided";

/// The authenticated user, attached to the request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized(NO_TOKEN_MESSAGE))
    }
}

/// Require a valid session cookie.
///
/// Verifies the token, loads the user it names and stores it in the request
/// extensions. Any failure ends the request with 401.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(&state.cookie.name)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::unauthorized(NO_TOKEN_MESSAGE))?;

    let user = AuthService::new(&state.db, &state.tokens)
        .authenticate(token)
        .await
        .map_err(|e| {
            tracing::debug!("Session rejected: {}", e);
            ApiError::from(e)
        })?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
