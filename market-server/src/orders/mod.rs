//! Order lifecycle
//!
//! - **lifecycle**: who may move an order between which statuses
//! - **create**: quote and place orders (coupon + slot + commission in one transaction)
//! - **service**: reading, status changes, courier assignment, cancellation
//!
//! # Data Flow
//!
//! ```text
//! request → service → sqlx transaction → commit
//!                                          ↓
//!                           notification rows + ChangeFeed event
//! ```

mod create;
pub mod lifecycle;
mod service;

pub use create::{place, quote};
pub use lifecycle::{Actor, check_move};
pub use service::{assign, available, cancel, get, list, load, participants, update_status};
