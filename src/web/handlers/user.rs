//! User profile handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::auth::{ProfileService, ProfileUpdateRequest};
use crate::db::UserSummary;
use crate::web::dto::{ApiResponse, UpdateProfileRequest, UserResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::CurrentUser;

use super::AppState;

/// GET /api/v1/users/suggestions - Users to connect with.
pub async fn get_suggestions(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<UserSummary>>>, ApiError> {
    let suggestions = ProfileService::new(&state.db, state.images.as_ref())
        .suggestions(&user)
        .await?;
    Ok(Json(ApiResponse::new(suggestions)))
}

/// GET /api/v1/users/:username - Public profile.
pub async fn get_public_profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = ProfileService::new(&state.db, state.images.as_ref())
        .public_profile(&username)
        .await?;
    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}

/// PATCH /api/v1/users/profile - Update the current user's profile.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let updated = ProfileService::new(&state.db, state.images.as_ref())
        .update_profile(&user, ProfileUpdateRequest::from(req))
        .await?;
    Ok(Json(ApiResponse::new(UserResponse::from(updated))))
}
