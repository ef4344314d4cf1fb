//! Notifications repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Notification, NotificationIntent},
};

#[derive(Clone)]
pub struct NotificationsRepository {
    pool: Pool<Postgres>,
}

impl NotificationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Store a notification for its user
    pub async fn create(&self, intent: &NotificationIntent) -> AppResult<Notification> {
        let row = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, message, data)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(intent.user_id)
        .bind(intent.kind)
        .bind(&intent.title)
        .bind(&intent.message)
        .bind(&intent.data)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
