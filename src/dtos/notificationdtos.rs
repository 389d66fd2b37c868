use serde::Serialize;

use crate::models::notificationmodel::{Notification, NotificationView};

#[derive(Debug, Serialize)]
pub struct NotificationResponseDto {
    pub status: String,
    pub notification: Notification,
}

#[derive(Debug, Serialize)]
pub struct NotificationListResponseDto {
    pub status: String,
    pub notifications: Vec<NotificationView>,
    pub results: i64,
}

#[derive(Debug, Serialize)]
pub struct UnreadNotificationResponseDto {
    pub status: String,
    pub unread: i64,
}
