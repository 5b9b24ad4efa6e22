//! Notification Model

use serde::{Deserialize, Serialize};

/// Notification kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum NotificationKind {
    OrderCreated,
    OrderStatusChanged,
    CourierAssigned,
    ApprovalChanged,
    General,
}

/// Per-user notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub order_id: Option<i64>,
    pub is_read: bool,
    pub created_at: i64,
}

/// Notification to be written
#[derive(Debug, Clone)]
pub struct NotificationCreate {
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub order_id: Option<i64>,
}

/// List query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
}
