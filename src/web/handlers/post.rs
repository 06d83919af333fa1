//! Post, comment and like handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::post::{EngagementService, LikeChange, PostService};
use crate::web::dto::{
    ApiResponse, CommentRequest, CreatePostRequest, MessageResponse, PostResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::CurrentUser;

use super::AppState;

/// GET /api/v1/posts - Feed of posts by the user's connections.
pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<PostResponse>>>, ApiError> {
    let posts = PostService::new(&state.db, state.images.as_ref())
        .feed(&user)
        .await?;
    Ok(Json(ApiResponse::new(
        posts.into_iter().map(PostResponse::from).collect(),
    )))
}

/// POST /api/v1/posts/create - Create a post.
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostResponse>>), ApiError> {
    let post = PostService::new(&state.db, state.images.as_ref())
        .create_post(&user, &req.content, req.image.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(PostResponse::from(post))),
    ))
}

/// DELETE /api/v1/posts/delete/:id - Delete one of the user's posts.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    PostService::new(&state.db, state.images.as_ref())
        .delete_post(&user, post_id)
        .await?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}

/// GET|POST /api/v1/posts/:id - A single post.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let post = PostService::new(&state.db, state.images.as_ref())
        .get_post(post_id)
        .await?;
    Ok(Json(ApiResponse::new(PostResponse::from(post))))
}

/// POST /api/v1/posts/:id/comment - Comment on a post.
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let post = EngagementService::new(&state.db, state.mailer.clone(), &state.links)
        .create_comment(&user, post_id, &req.content)
        .await?;
    Ok(Json(ApiResponse::new(PostResponse::from(post))))
}

/// POST /api/v1/posts/:id/like - Like or unlike a post.
pub async fn like_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let (change, post) = EngagementService::new(&state.db, state.mailer.clone(), &state.links)
        .toggle_like(&user, post_id)
        .await?;
    tracing::debug!(
        user_id = user.id,
        post_id,
        liked = matches!(change, LikeChange::Liked),
        "Like toggled"
    );
    Ok(Json(ApiResponse::new(PostResponse::from(post))))
}
