//! Workflow DTOs - Approval actions, votes, tickets and list filters

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use waqf::domain::{
    BeneficiaryStatus, DecisionStatus, DistributionShare, DocumentCategory, JournalStatus,
    TicketStatus, VoteChoice,
};
use waqf::{ApprovalAction, ApprovalStatus, BeneficiaryRequest, Distribution, UserRole};

/// Apply an approval action
#[derive(Debug, Deserialize, ToSchema)]
pub struct ActionRequest {
    pub action: ApprovalAction,
    pub note: Option<String>,
}

/// Beneficiary request with the actions open to the caller
#[derive(Debug, Serialize, ToSchema)]
pub struct RequestResponse {
    #[serde(flatten)]
    pub request: BeneficiaryRequest,
    pub next_actions: Vec<ApprovalAction>,
}

impl RequestResponse {
    pub fn for_role(request: BeneficiaryRequest, role: UserRole) -> Self {
        let next_actions = request.status.next_actions(role);
        Self {
            request,
            next_actions,
        }
    }
}

/// Distribution with the actions open to the caller
#[derive(Debug, Serialize, ToSchema)]
pub struct DistributionResponse {
    #[serde(flatten)]
    pub distribution: Distribution,
    pub next_actions: Vec<ApprovalAction>,
}

impl DistributionResponse {
    pub fn for_role(distribution: Distribution, role: UserRole) -> Self {
        let next_actions = distribution.status.next_actions(role);
        Self {
            distribution,
            next_actions,
        }
    }
}

/// Distribution with its shares and the actions open to the caller
#[derive(Debug, Serialize, ToSchema)]
pub struct DistributionDetailResponse {
    pub distribution: DistributionResponse,
    pub shares: Vec<DistributionShare>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RepayLoanRequest {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VoteRequest {
    pub choice: VoteChoice,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveTicketRequest {
    pub status: TicketStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignTicketRequest {
    pub assignee: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PreviewRequest {
    pub total: Decimal,
}

// ============================================
// Query filters
// ============================================

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BeneficiaryQuery {
    pub status: Option<BeneficiaryStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ApprovalQuery {
    pub status: Option<ApprovalStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ContractQuery {
    pub property_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PaymentQuery {
    pub contract_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DueQuery {
    /// Days ahead of today (default 7)
    pub days: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct JournalQuery {
    pub status: Option<JournalStatus>,
}

/// Inclusive date range for reports
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PeriodQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LoanQuery {
    pub beneficiary_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DecisionQuery {
    pub status: Option<DecisionStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ArchiveQuery {
    pub category: Option<DocumentCategory>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AuditQuery {
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use waqf::domain::RequestType;

    #[test]
    fn test_request_response_lists_next_actions() {
        let request = BeneficiaryRequest::new(
            Uuid::new_v4(),
            RequestType::Emergency,
            "علاج".to_string(),
            Some(Decimal::from(1200)),
        )
        .unwrap();

        let nazer = RequestResponse::for_role(request.clone(), UserRole::Nazer);
        assert_eq!(
            nazer.next_actions,
            vec![ApprovalAction::Approve, ApprovalAction::Reject]
        );

        let owner = RequestResponse::for_role(request, UserRole::Beneficiary);
        assert!(owner.next_actions.is_empty());

        let json = serde_json::to_value(&nazer).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["next_actions"][0], "approve");
    }
}
