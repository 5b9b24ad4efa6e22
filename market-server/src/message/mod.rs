//! 变更事件流
//!
//! # 架构
//!
//! ```text
//! service (写入提交后) ──▶ ChangeFeed::publish ──▶ broadcast::Sender<ChangeEvent>
//!                                                   │
//!                        ┌──────────────────────────┼──────────────────────┐
//!                        ▼                          ▼                      ▼
//!                  SSE 订阅者 (user A)        SSE 订阅者 (admin)        ...
//!                  按 Audience 过滤            看到全部
//! ```

mod feed;

pub use feed::ChangeFeed;
pub use shared::message::{Audience, ChangeAction, ChangeEvent, ChangeTable};
