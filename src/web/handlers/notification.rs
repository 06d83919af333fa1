//! Notification handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::notification::NotificationService;
use crate::web::dto::{ApiResponse, NotificationResponse};
use crate::web::error::ApiError;
use crate::web::middleware::CurrentUser;

use super::AppState;

/// GET /api/v1/notifications - The current user's notifications, newest first.
pub async fn get_notifications(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<NotificationResponse>>>, ApiError> {
    let notifications = NotificationService::new(&state.db)
        .list_for_user(&user)
        .await?;
    Ok(Json(ApiResponse::new(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    )))
}
