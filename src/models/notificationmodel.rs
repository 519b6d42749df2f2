// src/models/notificationmodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    DisputeFiled,
    Verdict,
    Resolution,
    CreditsTransferred,
    AccountSuspended,
    DiscountApplied,
}

impl NotificationKind {
    pub fn to_str(&self) -> &str {
        match self {
            NotificationKind::DisputeFiled => "dispute_filed",
            NotificationKind::Verdict => "verdict",
            NotificationKind::Resolution => "resolution",
            NotificationKind::CreditsTransferred => "credits_transferred",
            NotificationKind::AccountSuspended => "account_suspended",
            NotificationKind::DiscountApplied => "discount_applied",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub ticket_id: Option<Uuid>,
    pub metadata: Option<serde_json::Value>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub ticket_id: Option<Uuid>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationQueryParams {
    pub page: Option<i32>,
    pub limit: Option<i32>,
}
