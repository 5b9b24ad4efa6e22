//! Rating Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// What a rating is about
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum RatingTarget {
    Company,
    Courier,
}

/// Rating entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Rating {
    pub id: i64,
    pub order_id: i64,
    pub rater_id: String,
    pub target_type: RatingTarget,
    pub target_id: i64,
    /// 1..=5
    pub stars: i64,
    pub comment: Option<String>,
    pub created_at: i64,
}

/// Rate a delivered order
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RatingCreate {
    pub target_type: RatingTarget,
    #[validate(range(min = 1, max = 5))]
    pub stars: i64,
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

/// Aggregate of all ratings of one target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingSummary {
    pub target_type: RatingTarget,
    pub target_id: i64,
    pub count: i64,
    /// 0 when there are no ratings; one decimal place otherwise
    pub average: f64,
    /// Count per star value, index 0 = one star
    pub distribution: [i64; 5],
}
