//! Commission Override Matcher

use shared::models::{CommissionConfig, CommissionSource, DeliveryType, Plan};

/// Pick the override for a location from candidate rows.
///
/// A row whose `city` equals the requested city beats a country-wide row
/// (`city = NULL`). Rows for other keys, other cities or inactive rows are
/// ignored. When duplicates slip through, the lowest `id` wins.
pub fn select_override<'a>(
    candidates: &'a [CommissionConfig],
    country: &str,
    city: Option<&str>,
    plan: Plan,
    delivery_type: DeliveryType,
) -> Option<(&'a CommissionConfig, CommissionSource)> {
    let mut matching: Vec<&CommissionConfig> = candidates
        .iter()
        .filter(|c| {
            c.is_active && c.country == country && c.plan == plan && c.delivery_type == delivery_type
        })
        .collect();
    matching.sort_by_key(|c| c.id);

    if let Some(city) = city
        && let Some(row) = matching.iter().find(|c| c.city.as_deref() == Some(city))
    {
        return Some((row, CommissionSource::CityOverride));
    }

    matching
        .into_iter()
        .find(|c| c.city.is_none())
        .map(|row| (row, CommissionSource::CountryOverride))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(id: i64, city: Option<&str>, pct: f64) -> CommissionConfig {
        CommissionConfig {
            id,
            country: "AO".to_string(),
            city: city.map(str::to_string),
            plan: Plan::Basic,
            delivery_type: DeliveryType::PlatformDelivery,
            commission_percentage: pct,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    const KEY: (Plan, DeliveryType) = (Plan::Basic, DeliveryType::PlatformDelivery);

    #[test]
    fn test_city_beats_country() {
        let rows = vec![config(1, None, 12.0), config(2, Some("Luanda"), 10.0)];
        let (row, source) = select_override(&rows, "AO", Some("Luanda"), KEY.0, KEY.1).unwrap();
        assert_eq!(row.id, 2);
        assert_eq!(source, CommissionSource::CityOverride);
    }

    #[test]
    fn test_falls_back_to_country_row() {
        let rows = vec![config(1, None, 12.0), config(2, Some("Luanda"), 10.0)];
        let (row, source) = select_override(&rows, "AO", Some("Benguela"), KEY.0, KEY.1).unwrap();
        assert_eq!(row.id, 1);
        assert_eq!(source, CommissionSource::CountryOverride);

        let (row, _) = select_override(&rows, "AO", None, KEY.0, KEY.1).unwrap();
        assert_eq!(row.id, 1);
    }

    #[test]
    fn test_ignores_inactive_and_other_keys() {
        let mut inactive = config(1, None, 12.0);
        inactive.is_active = false;
        let mut premium = config(2, None, 11.0);
        premium.plan = Plan::Premium;
        let rows = vec![inactive, premium];
        assert!(select_override(&rows, "AO", None, KEY.0, KEY.1).is_none());
        assert!(select_override(&rows, "PT", None, Plan::Premium, KEY.1).is_none());
    }

    #[test]
    fn test_duplicates_take_lowest_id() {
        let rows = vec![config(9, None, 14.0), config(3, None, 11.0)];
        let (row, _) = select_override(&rows, "AO", None, KEY.0, KEY.1).unwrap();
        assert_eq!(row.id, 3);
    }

    #[test]
    fn test_city_row_does_not_apply_without_city() {
        let rows = vec![config(2, Some("Luanda"), 10.0)];
        assert!(select_override(&rows, "AO", None, KEY.0, KEY.1).is_none());
    }
}
