//! 变更事件 (change feed)
//!
//! Published by market-server after each committed write and delivered to
//! subscribed clients over SSE. Each event names the users allowed to see it
//! so the fan-out can filter per subscriber.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::util::now_millis;

/// Table the change happened on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTable {
    Orders,
    Companies,
    Couriers,
    Coupons,
    DeliverySlots,
    CommissionConfigs,
    Notifications,
}

impl fmt::Display for ChangeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeTable::Orders => "orders",
            ChangeTable::Companies => "companies",
            ChangeTable::Couriers => "couriers",
            ChangeTable::Coupons => "coupons",
            ChangeTable::DeliverySlots => "delivery_slots",
            ChangeTable::CommissionConfigs => "commission_configs",
            ChangeTable::Notifications => "notifications",
        };
        f.write_str(s)
    }
}

/// CRUD action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeAction::Created => "created",
            ChangeAction::Updated => "updated",
            ChangeAction::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// Who receives an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "users", rename_all = "snake_case")]
pub enum Audience {
    /// Every authenticated subscriber
    Everyone,
    /// Administrators only
    Admins,
    /// Listed user ids (admins always see them as well)
    Users(Vec<String>),
}

impl Audience {
    pub fn users<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Audience::Users(ids.into_iter().map(Into::into).collect())
    }

    /// Whether a subscriber with this user id / admin flag sees the event
    pub fn includes(&self, user_id: &str, is_admin: bool) -> bool {
        match self {
            Audience::Everyone => true,
            Audience::Admins => is_admin,
            Audience::Users(ids) => is_admin || ids.iter().any(|id| id == user_id),
        }
    }
}

/// A committed change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: ChangeTable,
    pub action: ChangeAction,
    pub record_id: i64,
    #[serde(skip)]
    pub audience: Option<Audience>,
    /// Snapshot of the record after the change (None for deletes)
    pub payload: Option<serde_json::Value>,
    pub timestamp: i64,
}

impl ChangeEvent {
    pub fn new(table: ChangeTable, action: ChangeAction, record_id: i64) -> Self {
        Self {
            table,
            action,
            record_id,
            audience: None,
            payload: None,
            timestamp: now_millis(),
        }
    }

    pub fn with_payload<T: Serialize>(mut self, payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(v) => self.payload = Some(v),
            Err(e) => tracing::warn!(table = %self.table, error = %e, "Change payload not serializable"),
        }
        self
    }

    pub fn to(mut self, audience: Audience) -> Self {
        self.audience = Some(audience);
        self
    }

    /// Events without an explicit audience go to admins only
    pub fn visible_to(&self, user_id: &str, is_admin: bool) -> bool {
        match &self.audience {
            Some(a) => a.includes(user_id, is_admin),
            None => is_admin,
        }
    }

    /// SSE event name, e.g. `orders.updated`
    pub fn event_name(&self) -> String {
        format!("{}.{}", self.table, self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_filtering() {
        let ev = ChangeEvent::new(ChangeTable::Orders, ChangeAction::Updated, 1)
            .to(Audience::users(["cust-1", "owner-9"]));
        assert!(ev.visible_to("cust-1", false));
        assert!(ev.visible_to("owner-9", false));
        assert!(!ev.visible_to("someone", false));
        assert!(ev.visible_to("admin", true));
    }

    #[test]
    fn test_default_audience_is_admins() {
        let ev = ChangeEvent::new(ChangeTable::Coupons, ChangeAction::Created, 2);
        assert!(!ev.visible_to("cust-1", false));
        assert!(ev.visible_to("admin", true));
    }

    #[test]
    fn test_event_name_and_serialization() {
        let ev = ChangeEvent::new(ChangeTable::DeliverySlots, ChangeAction::Deleted, 3)
            .to(Audience::Everyone);
        assert_eq!(ev.event_name(), "delivery_slots.deleted");
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["table"], "delivery_slots");
        assert_eq!(json["action"], "deleted");
        assert!(json.get("audience").is_none());
    }
}
