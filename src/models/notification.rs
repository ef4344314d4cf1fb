//! User notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::NotificationKind;

/// Persisted notification
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// A notification that an operation wants delivered once its changes are committed
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationIntent {
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
}

impl NotificationIntent {
    /// Intent about a booking; `data` carries the booking id and number
    pub fn for_booking(
        user_id: Uuid,
        kind: NotificationKind,
        title: &str,
        message: String,
        booking_id: Uuid,
        booking_number: &str,
    ) -> Self {
        Self {
            user_id,
            kind,
            title: title.to_string(),
            message,
            data: serde_json::json!({
                "bookingId": booking_id,
                "bookingNumber": booking_number,
            }),
        }
    }
}
