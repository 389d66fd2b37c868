use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Offer,
    Accept,
    ContactRequest,
    Unassign,
    JobCompleted,
    // Kept for parity with historical rows; nothing emits it currently.
    JobReopened,
}

impl NotificationType {
    pub fn to_str(&self) -> &str {
        match self {
            NotificationType::Offer => "offer",
            NotificationType::Accept => "accept",
            NotificationType::ContactRequest => "contact_request",
            NotificationType::Unassign => "unassign",
            NotificationType::JobCompleted => "job_completed",
            NotificationType::JobReopened => "job_reopened",
        }
    }
}

/// Created only as a side effect of lifecycle and social events, never by a
/// client directly. `related_id` references the triggering entity.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub r#type: NotificationType,
    pub related_id: Uuid,
    pub read: bool,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Notification joined with the post id the related offer points at, so the
/// client can resolve a deep link without extra round trips.
#[derive(Debug, Serialize, sqlx::FromRow, Clone)]
pub struct NotificationView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub r#type: NotificationType,
    pub related_id: Uuid,
    pub read: bool,
    pub post_id: Option<Uuid>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
