//! Ratings
//!
//! A customer rates the company and, for platform deliveries, the courier
//! of a delivered order. One rating per (order, rater, target type).

use rust_decimal::prelude::*;
use shared::models::{OrderStatus, Rating, RatingCreate, RatingSummary, RatingTarget};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, rating};
use crate::orders;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult, ErrorCode};

pub async fn create(
    state: &ServerState,
    user: &CurrentUser,
    order_id: i64,
    payload: RatingCreate,
) -> AppResult<Rating> {
    validate_payload(&payload)?;
    let order = orders::load(state, order_id).await?;

    if order.customer_id != user.id {
        return Err(AppError::not_owner(format!("Order {}", order_id)));
    }
    if order.status != OrderStatus::Delivered {
        return Err(AppError::new(ErrorCode::OrderNotDelivered).with_detail("order_id", order_id));
    }

    let target_id = match payload.target_type {
        RatingTarget::Company => order.company_id,
        RatingTarget::Courier => order.courier_id.ok_or_else(|| {
            AppError::validation("This order had no courier to rate")
        })?,
    };

    let created = rating::create(
        &state.pool,
        order_id,
        &user.id,
        payload.target_type,
        target_id,
        payload.stars,
        payload.comment.as_deref(),
    )
    .await
    .map_err(|e| match e {
        RepoError::Duplicate(_) => AppError::new(ErrorCode::RatingAlreadyExists)
            .with_detail("order_id", order_id),
        other => other.into(),
    })?;

    tracing::info!(
        rating_id = created.id,
        order_id,
        target = ?created.target_type,
        target_id,
        stars = created.stars,
        "Rating recorded"
    );
    Ok(created)
}

/// Fold `(stars, count)` rows into a summary
pub fn summarize(target_type: RatingTarget, target_id: i64, counts: &[(i64, i64)]) -> RatingSummary {
    let mut distribution = [0i64; 5];
    for &(stars, count) in counts {
        if (1..=5).contains(&stars) {
            distribution[(stars - 1) as usize] += count;
        }
    }

    let count: i64 = distribution.iter().sum();
    let weighted: i64 = distribution
        .iter()
        .enumerate()
        .map(|(i, c)| (i as i64 + 1) * c)
        .sum();

    let average = if count == 0 {
        0.0
    } else {
        (Decimal::from(weighted) / Decimal::from(count))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or_default()
    };

    RatingSummary {
        target_type,
        target_id,
        count,
        average,
        distribution,
    }
}

pub async fn summary(
    state: &ServerState,
    target_type: RatingTarget,
    target_id: i64,
) -> AppResult<RatingSummary> {
    let counts = rating::star_counts(&state.pool, target_type, target_id).await?;
    Ok(summarize(target_type, target_id, &counts))
}

pub async fn for_order(state: &ServerState, order_id: i64) -> AppResult<Vec<Rating>> {
    Ok(rating::find_by_order(&state.pool, order_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        let s = summarize(RatingTarget::Company, 1, &[]);
        assert_eq!(s.count, 0);
        assert_eq!(s.average, 0.0);
        assert_eq!(s.distribution, [0; 5]);
    }

    #[test]
    fn test_summary_average_and_distribution() {
        let s = summarize(RatingTarget::Courier, 9, &[(5, 2), (4, 1), (1, 1)]);
        assert_eq!(s.count, 4);
        // (10 + 4 + 1) / 4 = 3.75
        assert_eq!(s.average, 3.8);
        assert_eq!(s.distribution, [1, 0, 0, 1, 2]);
    }

    #[test]
    fn test_summary_ignores_out_of_range_stars() {
        let s = summarize(RatingTarget::Company, 1, &[(0, 3), (6, 1), (3, 1)]);
        assert_eq!(s.count, 1);
        assert_eq!(s.average, 3.0);
    }
}
