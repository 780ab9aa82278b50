//! BeneficiaryRequest - Aid, loan and data-change requests raised by beneficiaries

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{ApprovalAction, ApprovalStatus};

text_enum! {
    pub enum RequestType {
        FinancialAid => "financial_aid",
        Emergency => "emergency",
        Loan => "loan",
        DataUpdate => "data_update",
        Other => "other",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BeneficiaryRequest {
    pub id: Uuid,
    pub beneficiary_id: Uuid,
    pub request_type: RequestType,
    pub description: String,
    pub amount: Option<Decimal>,
    pub status: ApprovalStatus,
    pub decision_note: Option<String>,
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewBeneficiaryRequest {
    /// Ignored for beneficiary callers, who always file for themselves
    pub beneficiary_id: Option<Uuid>,
    pub request_type: RequestType,
    pub description: String,
    pub amount: Option<Decimal>,
}

impl BeneficiaryRequest {
    /// New requests start in `pending`
    pub fn new(
        beneficiary_id: Uuid,
        request_type: RequestType,
        description: String,
        amount: Option<Decimal>,
    ) -> Result<Self, DomainError> {
        if description.trim().is_empty() {
            return Err(DomainError::validation("description is required"));
        }
        let needs_amount = matches!(
            request_type,
            RequestType::FinancialAid | RequestType::Emergency | RequestType::Loan
        );
        match amount {
            Some(a) if a <= Decimal::ZERO => {
                return Err(DomainError::validation("amount must be positive"))
            }
            None if needs_amount => {
                return Err(DomainError::Validation(format!(
                    "amount is required for {request_type} requests"
                )))
            }
            _ => {}
        }

        Ok(Self {
            id: Uuid::new_v4(),
            beneficiary_id,
            request_type,
            description: description.trim().to_string(),
            amount,
            status: ApprovalStatus::Pending,
            decision_note: None,
            decided_by: None,
            decided_at: None,
            created_at: Utc::now(),
        })
    }

    /// Move through the approval workflow, recording who decided
    pub fn decide(
        mut self,
        action: ApprovalAction,
        actor: Uuid,
        note: Option<String>,
    ) -> Result<Self, DomainError> {
        self.status = self.status.transition(action)?;
        if matches!(action, ApprovalAction::Approve | ApprovalAction::Reject) {
            self.decided_by = Some(actor);
            self.decided_at = Some(Utc::now());
        }
        if note.is_some() {
            self.decision_note = note;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financial_request_needs_amount() {
        let result = BeneficiaryRequest::new(
            Uuid::new_v4(),
            RequestType::FinancialAid,
            "رسوم دراسية".to_string(),
            None,
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let ok = BeneficiaryRequest::new(
            Uuid::new_v4(),
            RequestType::DataUpdate,
            "تحديث رقم الجوال".to_string(),
            None,
        )
        .unwrap();
        assert_eq!(ok.status, ApprovalStatus::Pending);
    }

    #[test]
    fn test_decide_records_actor() {
        let actor = Uuid::new_v4();
        let request = BeneficiaryRequest::new(
            Uuid::new_v4(),
            RequestType::Emergency,
            "علاج".to_string(),
            Some(Decimal::from(5000)),
        )
        .unwrap()
        .decide(ApprovalAction::Approve, actor, Some("موافق".to_string()))
        .unwrap();

        assert_eq!(request.status, ApprovalStatus::Approved);
        assert_eq!(request.decided_by, Some(actor));
        assert!(request.decided_at.is_some());
        assert_eq!(request.decision_note.as_deref(), Some("موافق"));
    }
}
