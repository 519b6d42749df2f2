// db/notificationdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::notificationmodel::*;

#[async_trait]
pub trait NotificationExt {
    async fn store_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, Error>;

    async fn get_user_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, Error>;

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Notification>, Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn store_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications
            (user_id, kind, title, message, ticket_id, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING id, user_id, kind, title, message, ticket_id, metadata, is_read, created_at
            "#
        )
        .bind(notification.user_id)
        .bind(notification.kind)
        .bind(notification.title)
        .bind(notification.message)
        .bind(notification.ticket_id)
        .bind(notification.metadata)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_user_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, kind, title, message, ticket_id, metadata, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Notification>, Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, kind, title, message, ticket_id, metadata, is_read, created_at
            "#
        )
        .bind(notification_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }
}
