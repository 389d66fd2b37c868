// db/notificationdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::notificationmodel::{Notification, NotificationType, NotificationView};

#[async_trait]
pub trait NotificationExt {
    async fn save_notification(
        &self,
        user_id: Uuid,
        notification_type: NotificationType,
        related_id: Uuid,
    ) -> Result<Notification, sqlx::Error>;

    async fn get_notification(
        &self,
        notification_id: Uuid,
    ) -> Result<Option<Notification>, sqlx::Error>;

    /// The user's notifications, newest first, each resolved to the post the
    /// related offer points at (when the related entity is an offer) so the
    /// client can deep-link in one hop.
    async fn get_notifications(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<NotificationView>, sqlx::Error>;

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
    ) -> Result<Notification, sqlx::Error>;

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, sqlx::Error>;

    async fn unread_notification_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;

    async fn delete_notification(&self, notification_id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn save_notification(
        &self,
        user_id: Uuid,
        notification_type: NotificationType,
        related_id: Uuid,
    ) -> Result<Notification, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, type, related_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(notification_type)
        .bind(related_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_notification(
        &self,
        notification_id: Uuid,
    ) -> Result<Option<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(notification_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_notifications(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<NotificationView>, sqlx::Error> {
        sqlx::query_as::<_, NotificationView>(
            r#"
            SELECT n.id, n.user_id, n.type, n.related_id, n.read,
                   COALESCE(o.post_id, p.id) AS post_id,
                   n.created_at
            FROM notifications n
            LEFT JOIN offers o ON o.id = n.related_id
            LEFT JOIN posts p ON p.id = n.related_id
            WHERE n.user_id = $1
            ORDER BY n.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
    ) -> Result<Notification, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET read = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(notification_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE")
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn unread_notification_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0)
    }

    async fn delete_notification(&self, notification_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(notification_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
