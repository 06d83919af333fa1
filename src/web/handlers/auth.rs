//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::auth::{AuthService, SignupRequest as SignupData};
use crate::web::dto::{
    ApiResponse, LoginRequest, MessageResponse, SignupRequest, UserResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::CurrentUser;

use super::AppState;

/// POST /api/v1/auth/signup - Create an account and open a session.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<ApiResponse<UserResponse>>), ApiError> {
    let session = AuthService::new(&state.db, &state.tokens)
        .with_welcome_mail(state.mailer.clone(), &state.links)
        .signup(&SignupData::from(req))
        .await?;

    let jar = jar.add(state.cookie.session_cookie(session.token));
    Ok((
        StatusCode::CREATED,
        jar,
        Json(ApiResponse::new(UserResponse::from(session.user))),
    ))
}

/// POST /api/v1/auth/login - Log in with username and password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<UserResponse>>), ApiError> {
    let session = AuthService::new(&state.db, &state.tokens)
        .login(&req.username, &req.password)
        .await?;

    let jar = jar.add(state.cookie.session_cookie(session.token));
    Ok((jar, Json(ApiResponse::new(UserResponse::from(session.user)))))
}

/// POST /api/v1/auth/logout - Clear the session cookie.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.add(state.cookie.expired_cookie()),
        Json(MessageResponse::new("Logged out successfully")),
    )
}

/// GET /api/v1/auth/check-auth - Current session's user.
pub async fn check_auth(CurrentUser(user): CurrentUser) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::new(UserResponse::from(user)))
}
