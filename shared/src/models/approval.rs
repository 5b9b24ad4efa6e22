//! Approval workflow status shared by companies and couriers

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Registration review status (审核状态)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// Admin decisions never move a record back to pending and never
    /// re-apply the current status.
    pub fn can_transition_to(&self, next: ApprovalStatus) -> bool {
        next != ApprovalStatus::Pending && next != *self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reject payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RejectRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// Optional `?status=` filter for admin listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApprovalFilter {
    pub status: Option<ApprovalStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use ApprovalStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Rejected.can_transition_to(Approved));
        assert!(Approved.can_transition_to(Rejected));
        assert!(!Approved.can_transition_to(Approved));
        assert!(!Rejected.can_transition_to(Pending));
    }
}
