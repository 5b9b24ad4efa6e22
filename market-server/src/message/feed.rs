//! ChangeFeed 实现

use futures::stream::{self, BoxStream, StreamExt};
use shared::message::ChangeEvent;
use tokio::sync::broadcast;

/// 变更事件广播
///
/// 发布是尽力而为: 没有订阅者时事件直接丢弃，落后太多的订阅者
/// 会跳过中间的事件 (记录 warn)。持久化的通知在 `notification` 表中。
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// 发布事件 (写入提交之后调用)
    pub fn publish(&self, event: ChangeEvent) {
        let name = event.event_name();
        match self.tx.send(event) {
            Ok(receivers) => tracing::debug!(event = %name, receivers, "Change event published"),
            Err(_) => tracing::trace!(event = %name, "No subscribers for change event"),
        }
    }

    /// 原始订阅 (不过滤)
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// 按用户过滤的事件流 (供 SSE 使用)
    pub fn stream_for(&self, user_id: String, is_admin: bool) -> BoxStream<'static, ChangeEvent> {
        let rx = self.tx.subscribe();
        stream::unfold((rx, user_id), move |(mut rx, user_id)| async move {
            loop {
                match rx.recv().await {
                    Ok(event) if event.visible_to(&user_id, is_admin) => {
                        return Some((event, (rx, user_id)));
                    }
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(user_id = %user_id, skipped, "Change feed subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::{Audience, ChangeAction, ChangeTable};

    fn event(id: i64, audience: Option<Audience>) -> ChangeEvent {
        let ev = ChangeEvent::new(ChangeTable::Orders, ChangeAction::Updated, id);
        match audience {
            Some(a) => ev.to(a),
            None => ev,
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let feed = ChangeFeed::new(4);
        feed.publish(event(1, Some(Audience::Everyone)));
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_stream_filters_by_audience() {
        let feed = ChangeFeed::new(16);
        let mut alice = feed.stream_for("alice".to_string(), false);
        let mut admin = feed.stream_for("root".to_string(), true);

        feed.publish(event(1, Some(Audience::users(["bob"]))));
        feed.publish(event(2, None));
        feed.publish(event(3, Some(Audience::users(["alice", "bob"]))));
        feed.publish(event(4, Some(Audience::Everyone)));

        assert_eq!(alice.next().await.map(|e| e.record_id), Some(3));
        assert_eq!(alice.next().await.map(|e| e.record_id), Some(4));

        // admins also receive user-addressed events
        let seen: Vec<i64> = admin.by_ref().take(4).map(|e| e.record_id).collect().await;
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_stream_ends_when_feed_dropped() {
        let feed = ChangeFeed::new(4);
        let mut stream = feed.stream_for("alice".to_string(), false);
        drop(feed);
        assert!(stream.next().await.is_none());
    }
}
