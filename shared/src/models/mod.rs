//! Data models
//!
//! Shared between market-server and clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes; user ids are the identity provider's
//! subject strings.

pub mod approval;
pub mod commission;
pub mod company;
pub mod coupon;
pub mod courier;
pub mod customer;
pub mod delivery_slot;
pub mod notification;
pub mod order;
pub mod plan;
pub mod rating;
pub mod report;

// Re-exports
pub use approval::*;
pub use commission::*;
pub use company::*;
pub use coupon::*;
pub use courier::*;
pub use customer::*;
pub use delivery_slot::*;
pub use notification::*;
pub use order::*;
pub use plan::*;
pub use rating::*;
pub use report::*;
