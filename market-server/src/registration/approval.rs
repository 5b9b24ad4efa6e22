//! Approval workflow (admin)
//!
//! pending → approved | rejected, and re-review between approved and
//! rejected. Nothing goes back to pending. Each update is guarded by the
//! status read beforehand, so two admins deciding at once cannot both win.

use shared::message::{Audience, ChangeAction, ChangeEvent, ChangeTable};
use shared::models::{ApprovalStatus, Company, Courier, NotificationKind};

use super::companies::{self, company_not_found};
use super::couriers::{self, courier_not_found};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{company, courier};
use crate::notifications;
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Check a transition is allowed
pub fn check_transition(from: ApprovalStatus, to: ApprovalStatus) -> AppResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::with_message(
            ErrorCode::InvalidApprovalTransition,
            format!("Cannot move from {} to {}", from, to),
        )
        .with_detail("from", from.as_str())
        .with_detail("to", to.as_str()))
    }
}

fn reason_for(to: ApprovalStatus, reason: Option<&str>) -> AppResult<Option<&str>> {
    match (to, reason.map(str::trim)) {
        (ApprovalStatus::Rejected, Some(r)) if !r.is_empty() => Ok(Some(r)),
        (ApprovalStatus::Rejected, _) => Err(AppError::validation("A rejection reason is required")),
        _ => Ok(None),
    }
}

fn decision_text(to: ApprovalStatus, reason: Option<&str>) -> String {
    match (to, reason) {
        (ApprovalStatus::Approved, _) => "Your registration was approved".to_string(),
        (_, Some(r)) => format!("Your registration was rejected: {}", r),
        _ => "Your registration was rejected".to_string(),
    }
}

pub async fn decide_company(
    state: &ServerState,
    admin: &CurrentUser,
    id: i64,
    to: ApprovalStatus,
    reason: Option<&str>,
) -> AppResult<Company> {
    let current = companies::load(state, id).await?;
    check_transition(current.status, to)?;
    let reason = reason_for(to, reason)?;

    if !company::set_status(&state.pool, id, current.status, to, reason).await? {
        return Err(AppError::conflict(format!(
            "Company {} was modified concurrently, reload and retry",
            id
        )));
    }
    let updated = company::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| company_not_found(id))?;

    security_log!(
        "INFO",
        "company_review",
        company_id = id,
        status = to.as_str(),
        admin_id = admin.id.clone()
    );

    state.publish(
        ChangeEvent::new(ChangeTable::Companies, ChangeAction::Updated, id)
            .with_payload(&updated)
            .to(Audience::users([updated.owner_id.clone()])),
    );
    notifications::notify(
        state,
        notifications::message(
            updated.owner_id.clone(),
            NotificationKind::ApprovalChanged,
            format!("Company {}", to),
            decision_text(to, reason),
            None,
        ),
    )
    .await;

    Ok(updated)
}

pub async fn decide_courier(
    state: &ServerState,
    admin: &CurrentUser,
    id: i64,
    to: ApprovalStatus,
    reason: Option<&str>,
) -> AppResult<Courier> {
    let current = couriers::load(state, id).await?;
    check_transition(current.status, to)?;
    let reason = reason_for(to, reason)?;

    if !courier::set_status(&state.pool, id, current.status, to, reason).await? {
        return Err(AppError::conflict(format!(
            "Courier {} was modified concurrently, reload and retry",
            id
        )));
    }
    let updated = courier::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| courier_not_found(id))?;

    security_log!(
        "INFO",
        "courier_review",
        courier_id = id,
        status = to.as_str(),
        admin_id = admin.id.clone()
    );

    state.publish(
        ChangeEvent::new(ChangeTable::Couriers, ChangeAction::Updated, id)
            .with_payload(&updated)
            .to(Audience::users([updated.user_id.clone()])),
    );
    notifications::notify(
        state,
        notifications::message(
            updated.user_id.clone(),
            NotificationKind::ApprovalChanged,
            format!("Courier {}", to),
            decision_text(to, reason),
            None,
        ),
    )
    .await;

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_transition() {
        use ApprovalStatus::*;
        assert!(check_transition(Pending, Approved).is_ok());
        assert!(check_transition(Approved, Rejected).is_ok());
        let err = check_transition(Approved, Approved).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidApprovalTransition);
        assert!(check_transition(Rejected, Pending).is_err());
    }

    #[test]
    fn test_rejection_requires_reason() {
        assert!(reason_for(ApprovalStatus::Rejected, None).is_err());
        assert!(reason_for(ApprovalStatus::Rejected, Some("  ")).is_err());
        assert_eq!(
            reason_for(ApprovalStatus::Rejected, Some(" blurry NIF ")).unwrap(),
            Some("blurry NIF")
        );
        assert_eq!(reason_for(ApprovalStatus::Approved, Some("x")).unwrap(), None);
    }
}
