//! Commission Calculator

use rust_decimal::prelude::*;

use crate::order_money::to_decimal;

/// `round(subtotal × rate / 100)` to a whole unit, midpoint away from zero
pub fn commission_amount(subtotal: f64, rate: f64) -> f64 {
    let amount = to_decimal(subtotal) * to_decimal(rate) / Decimal::ONE_HUNDRED;
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{DeliveryType, Plan};

    #[test]
    fn test_reference_amounts() {
        let basic = Plan::Basic.default_commission_percentage(DeliveryType::PlatformDelivery);
        let premium = Plan::Premium.default_commission_percentage(DeliveryType::PlatformDelivery);
        assert_eq!(commission_amount(2500.0, basic), 375.0);
        assert_eq!(commission_amount(2500.0, premium), 500.0);
    }

    #[test]
    fn test_every_default_rate() {
        for plan in Plan::ALL {
            for dt in DeliveryType::ALL {
                let rate = plan.default_commission_percentage(dt);
                let expected = (1234.0 * rate / 100.0_f64).round();
                assert_eq!(commission_amount(1234.0, rate), expected, "{plan} {dt}");
            }
        }
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        // 10 × 5% = 0.5
        assert_eq!(commission_amount(10.0, 5.0), 1.0);
        // 30 × 5% = 1.5
        assert_eq!(commission_amount(30.0, 5.0), 2.0);
        // 29 × 5% = 1.45
        assert_eq!(commission_amount(29.0, 5.0), 1.0);
    }

    #[test]
    fn test_zero_subtotal() {
        assert_eq!(commission_amount(0.0, 20.0), 0.0);
    }
}
