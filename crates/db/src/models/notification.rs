//! Notification model.

use lockedin_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "read")]
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub action_url: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

/// `PUT /notifications/{id}` payload.
#[derive(Debug, Deserialize)]
pub struct UpdateNotification {
    pub read: bool,
}
