//! Commission Resolver
//!
//! Looks up overrides through [`CommissionLookup`]. A failed lookup never
//! fails the caller: the plan default is used and the quote is marked
//! [`CommissionSource::Degraded`].

use shared::models::{CommissionConfig, CommissionQuote, CommissionSource, DeliveryType, Plan};
use sqlx::SqlitePool;

use super::calculator::commission_amount;
use super::matcher::select_override;
use crate::db::repository::{RepoResult, commission_config};

/// Source of active override rows
#[allow(async_fn_in_trait)]
pub trait CommissionLookup {
    async fn active_candidates(
        &self,
        country: &str,
        city: Option<&str>,
        plan: Plan,
        delivery_type: DeliveryType,
    ) -> RepoResult<Vec<CommissionConfig>>;
}

impl CommissionLookup for SqlitePool {
    async fn active_candidates(
        &self,
        country: &str,
        city: Option<&str>,
        plan: Plan,
        delivery_type: DeliveryType,
    ) -> RepoResult<Vec<CommissionConfig>> {
        commission_config::find_active_candidates(self, country, city, plan, delivery_type).await
    }
}

/// What the resolver needs to know about an order
#[derive(Debug, Clone)]
pub struct CommissionRequest<'a> {
    pub subtotal: f64,
    pub plan: Plan,
    pub delivery_type: DeliveryType,
    pub country: Option<&'a str>,
    pub city: Option<&'a str>,
}

/// Build a quote from already-loaded candidates (no I/O)
pub fn quote_from(req: &CommissionRequest<'_>, candidates: &[CommissionConfig]) -> CommissionQuote {
    let matched = req.country.and_then(|country| {
        select_override(candidates, country, req.city, req.plan, req.delivery_type)
    });

    match matched {
        Some((row, source)) => CommissionQuote {
            rate: row.commission_percentage,
            amount: commission_amount(req.subtotal, row.commission_percentage),
            source,
            config_id: Some(row.id),
        },
        None => plan_default(req, CommissionSource::PlanDefault),
    }
}

fn plan_default(req: &CommissionRequest<'_>, source: CommissionSource) -> CommissionQuote {
    let rate = req.plan.default_commission_percentage(req.delivery_type);
    CommissionQuote {
        rate,
        amount: commission_amount(req.subtotal, rate),
        source,
        config_id: None,
    }
}

/// Resolve the commission for an order
pub async fn resolve<L: CommissionLookup>(lookup: &L, req: &CommissionRequest<'_>) -> CommissionQuote {
    let Some(country) = req.country else {
        return plan_default(req, CommissionSource::PlanDefault);
    };

    match lookup
        .active_candidates(country, req.city, req.plan, req.delivery_type)
        .await
    {
        Ok(candidates) => quote_from(req, &candidates),
        Err(e) => {
            tracing::warn!(
                error = %e,
                country = %country,
                plan = %req.plan,
                delivery_type = %req.delivery_type,
                "Commission override lookup failed, using plan default"
            );
            plan_default(req, CommissionSource::Degraded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::RepoError;

    struct FixedRows(Vec<CommissionConfig>);

    impl CommissionLookup for FixedRows {
        async fn active_candidates(
            &self,
            _country: &str,
            _city: Option<&str>,
            _plan: Plan,
            _delivery_type: DeliveryType,
        ) -> RepoResult<Vec<CommissionConfig>> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    impl CommissionLookup for Broken {
        async fn active_candidates(
            &self,
            _country: &str,
            _city: Option<&str>,
            _plan: Plan,
            _delivery_type: DeliveryType,
        ) -> RepoResult<Vec<CommissionConfig>> {
            Err(RepoError::Database("disk I/O error".into()))
        }
    }

    fn request(plan: Plan, city: Option<&'static str>) -> CommissionRequest<'static> {
        CommissionRequest {
            subtotal: 2500.0,
            plan,
            delivery_type: DeliveryType::PlatformDelivery,
            country: Some("AO"),
            city,
        }
    }

    fn row(id: i64, city: Option<&str>, pct: f64) -> CommissionConfig {
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

    #[tokio::test]
    async fn test_plan_default_without_override() {
        let quote = resolve(&FixedRows(vec![]), &request(Plan::Basic, None)).await;
        assert_eq!(quote.rate, 15.0);
        assert_eq!(quote.amount, 375.0);
        assert_eq!(quote.source, CommissionSource::PlanDefault);

        let quote = resolve(&FixedRows(vec![]), &request(Plan::Premium, None)).await;
        assert_eq!(quote.amount, 500.0);
    }

    #[tokio::test]
    async fn test_city_override_wins() {
        let rows = vec![row(1, None, 12.0), row(2, Some("Luanda"), 10.0)];
        let quote = resolve(&FixedRows(rows), &request(Plan::Basic, Some("Luanda"))).await;
        assert_eq!(quote.rate, 10.0);
        assert_eq!(quote.amount, 250.0);
        assert_eq!(quote.source, CommissionSource::CityOverride);
        assert_eq!(quote.config_id, Some(2));
    }

    #[tokio::test]
    async fn test_lookup_failure_degrades() {
        let quote = resolve(&Broken, &request(Plan::Basic, Some("Luanda"))).await;
        assert_eq!(quote.rate, 15.0);
        assert_eq!(quote.amount, 375.0);
        assert_eq!(quote.source, CommissionSource::Degraded);
    }

    #[tokio::test]
    async fn test_no_country_skips_lookup() {
        let mut req = request(Plan::Premium, None);
        req.country = None;
        let quote = resolve(&Broken, &req).await;
        assert_eq!(quote.source, CommissionSource::PlanDefault);
        assert_eq!(quote.rate, 20.0);
    }
}
