//! Commission Resolution
//!
//! (plan, delivery type, location) → rate and amount.
//!
//! - [`matcher`]: pick the most specific active override
//! - [`calculator`]: rate × subtotal, rounded to whole units
//! - [`resolver`]: lookup + fallback to the plan table

pub mod calculator;
pub mod matcher;
mod resolver;

pub use calculator::commission_amount;
pub use matcher::select_override;
pub use resolver::{CommissionLookup, CommissionRequest, quote_from, resolve};
