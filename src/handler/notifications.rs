use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{delete, get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    dtos::{
        notificationdtos::{
            NotificationListResponseDto, NotificationResponseDto, UnreadNotificationResponseDto,
        },
        userdtos::Response,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn notifications_handler() -> Router {
    Router::new()
        .route("/", get(get_notifications))
        .route("/unread-count", get(get_unread_count))
        .route("/read-all", put(mark_all_read))
        .route("/:notification_id/read", put(mark_read))
        .route("/:notification_id", delete(delete_notification))
}

pub async fn get_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let notifications = app_state
        .notification_service
        .list_for_user(auth.user.id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(NotificationListResponseDto {
        status: "success".to_string(),
        results: notifications.len() as i64,
        notifications,
    }))
}

pub async fn get_unread_count(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let unread = app_state
        .notification_service
        .unread_count(auth.user.id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(UnreadNotificationResponseDto {
        status: "success".to_string(),
        unread,
    }))
}

pub async fn mark_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let notification = app_state
        .notification_service
        .mark_read(auth.user.id, notification_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(NotificationResponseDto {
        status: "success".to_string(),
        notification,
    }))
}

pub async fn mark_all_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let updated = app_state
        .notification_service
        .mark_all_read(auth.user.id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(Response {
        status: "success",
        message: format!("{updated} notifications marked as read"),
    }))
}

pub async fn delete_notification(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .notification_service
        .delete(auth.user.id, notification_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(Response {
        status: "success",
        message: "Notification deleted".to_string(),
    }))
}
