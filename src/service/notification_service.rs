// service/notification_service.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, notificationdb::NotificationExt},
    models::notificationmodel::{Notification, NotificationType, NotificationView},
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct NotificationService {
    db_client: Arc<DBClient>,
}

impl NotificationService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Best-effort dispatch: a failed insert is logged and swallowed so the
    /// triggering operation still succeeds.
    pub async fn dispatch(
        &self,
        recipient_id: Uuid,
        notification_type: NotificationType,
        related_id: Uuid,
    ) {
        match self
            .db_client
            .save_notification(recipient_id, notification_type, related_id)
            .await
        {
            Ok(_) => {
                tracing::info!(
                    "notification {} -> user {} (related {})",
                    notification_type.to_str(),
                    recipient_id,
                    related_id
                );
            }
            Err(err) => {
                tracing::warn!(
                    "failed to dispatch {} notification to user {}: {}",
                    notification_type.to_str(),
                    recipient_id,
                    err
                );
            }
        }
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<NotificationView>, ServiceError> {
        Ok(self.db_client.get_notifications(user_id).await?)
    }

    pub async fn mark_read(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> Result<Notification, ServiceError> {
        let notification = self
            .db_client
            .get_notification(notification_id)
            .await?
            .ok_or(ServiceError::NotificationNotFound(notification_id))?;

        if notification.user_id != user_id {
            return Err(ServiceError::Authorization);
        }

        Ok(self.db_client.mark_notification_read(notification_id).await?)
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, ServiceError> {
        Ok(self.db_client.mark_all_notifications_read(user_id).await?)
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, ServiceError> {
        Ok(self.db_client.unread_notification_count(user_id).await?)
    }

    pub async fn delete(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> Result<(), ServiceError> {
        let notification = self
            .db_client
            .get_notification(notification_id)
            .await?
            .ok_or(ServiceError::NotificationNotFound(notification_id))?;

        if notification.user_id != user_id {
            return Err(ServiceError::Authorization);
        }

        self.db_client.delete_notification(notification_id).await?;
        Ok(())
    }
}
