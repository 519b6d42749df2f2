// src/handler/notification_handler.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::notificationmodel::NotificationQueryParams,
    utils::pagination::page_window,
    AppState,
};

pub fn notification_handler() -> Router {
    Router::new()
        .route("/", get(get_notifications))
        .route("/:notification_id/read", put(mark_as_read))
}

pub async fn get_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(params): Query<NotificationQueryParams>,
) -> Result<impl IntoResponse, HttpError> {
    let page = params.page.unwrap_or(1).max(1);
    let (limit, offset) = page_window(params.page, params.limit, 20);

    let notifications = app_state
        .notification_service
        .get_user_notifications(auth.user.id, limit, offset)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "notifications": notifications,
            "page": page,
            "limit": limit
        }
    })))
}

pub async fn mark_as_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let notification = app_state
        .notification_service
        .mark_as_read(notification_id, auth.user.id)
        .await?
        .ok_or_else(|| HttpError::not_found("Notification not found"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": notification
    })))
}
