//! 通知服务
//!
//! 通知写入 `notification` 表并推送到变更事件流。投递失败只记录日志，
//! 不影响触发它的业务操作。

use shared::message::{Audience, ChangeAction, ChangeEvent, ChangeTable};
use shared::models::{Notification, NotificationCreate, NotificationKind, NotificationQuery};

use crate::core::ServerState;
use crate::db::repository::notification;
use crate::utils::{AppError, AppResult, ErrorCode};

/// 写入并推送一条通知 (尽力而为)
pub async fn notify(state: &ServerState, data: NotificationCreate) -> Option<Notification> {
    match notification::create(&state.pool, &data).await {
        Ok(n) => {
            state.publish(
                ChangeEvent::new(ChangeTable::Notifications, ChangeAction::Created, n.id)
                    .with_payload(&n)
                    .to(Audience::users([n.user_id.clone()])),
            );
            Some(n)
        }
        Err(e) => {
            tracing::warn!(
                user_id = %data.user_id,
                kind = ?data.kind,
                error = %e,
                "Failed to store notification"
            );
            None
        }
    }
}

/// 构造通知内容
pub fn message(
    user_id: impl Into<String>,
    kind: NotificationKind,
    title: impl Into<String>,
    body: impl Into<String>,
    order_id: Option<i64>,
) -> NotificationCreate {
    NotificationCreate {
        user_id: user_id.into(),
        kind,
        title: title.into(),
        body: body.into(),
        order_id,
    }
}

pub async fn list(
    state: &ServerState,
    user_id: &str,
    query: &NotificationQuery,
) -> AppResult<Vec<Notification>> {
    Ok(notification::find_by_user(&state.pool, user_id, query.unread_only, query.limit).await?)
}

pub async fn mark_read(state: &ServerState, user_id: &str, id: i64) -> AppResult<()> {
    if notification::mark_read(&state.pool, id, user_id).await? {
        Ok(())
    } else {
        Err(AppError::with_message(
            ErrorCode::NotificationNotFound,
            format!("Notification {} not found", id),
        ))
    }
}

pub async fn mark_all_read(state: &ServerState, user_id: &str) -> AppResult<u64> {
    Ok(notification::mark_all_read(&state.pool, user_id).await?)
}

pub async fn unread_count(state: &ServerState, user_id: &str) -> AppResult<i64> {
    Ok(notification::count_unread(&state.pool, user_id).await?)
}
