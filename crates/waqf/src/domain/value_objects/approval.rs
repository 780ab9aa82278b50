//! Approval workflow - Status progression for requests and distributions

use super::{Permission, UserRole};
use crate::domain::errors::DomainError;

text_enum! {
    /// Where a record sits in the approval workflow
    pub enum ApprovalStatus {
        Draft => "draft",
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Completed => "completed",
    }
}

text_enum! {
    /// Actions that move a record between approval statuses
    pub enum ApprovalAction {
        Submit => "submit",
        Approve => "approve",
        Reject => "reject",
        Complete => "complete",
        Reopen => "reopen",
    }
}

impl ApprovalAction {
    /// Permission required to perform the action; `None` means the record owner may act.
    pub fn required_permission(&self) -> Option<Permission> {
        match self {
            ApprovalAction::Submit => None,
            ApprovalAction::Approve | ApprovalAction::Reject | ApprovalAction::Reopen => {
                Some(Permission::ApproveRequests)
            }
            ApprovalAction::Complete => Some(Permission::CompleteDisbursements),
        }
    }

    pub fn allowed_for(&self, role: UserRole) -> bool {
        self.required_permission()
            .map(|p| role.can(p))
            .unwrap_or(true)
    }
}

impl ApprovalStatus {
    /// Status reached by applying `action`, or a conflict if the pair is not a valid edge
    pub fn transition(&self, action: ApprovalAction) -> Result<ApprovalStatus, DomainError> {
        use ApprovalAction as A;
        use ApprovalStatus as S;

        match (self, action) {
            (S::Draft, A::Submit) => Ok(S::Pending),
            (S::Pending, A::Approve) => Ok(S::Approved),
            (S::Pending, A::Reject) => Ok(S::Rejected),
            (S::Approved, A::Complete) => Ok(S::Completed),
            (S::Rejected, A::Reopen) => Ok(S::Draft),
            (from, action) => Err(DomainError::Conflict(format!(
                "Cannot {action} a record that is {from}"
            ))),
        }
    }

    /// Actions `role` may take from this status
    pub fn next_actions(&self, role: UserRole) -> Vec<ApprovalAction> {
        ApprovalAction::ALL
            .iter()
            .copied()
            .filter(|a| self.transition(*a).is_ok() && a.allowed_for(role))
            .collect()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ApprovalStatus::Completed)
    }
}
