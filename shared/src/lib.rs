//! Shared types for the marketplace
//!
//! Domain models, the unified error system, change-feed events and small
//! utilities used by market-server and its clients.

pub mod client_state;
pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use message::{Audience, ChangeAction, ChangeEvent, ChangeTable};
