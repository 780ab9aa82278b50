//! Beneficiary Request Application Service
//!
//! Beneficiaries see and raise only their own requests. Staff act on
//! requests through the approval workflow; decisions notify the
//! beneficiary.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use waqf::domain::NewBeneficiaryRequest;
use waqf::{
    ApprovalAction, ApprovalStatus, Beneficiary, BeneficiaryRepository, BeneficiaryRequest,
    DomainError, Notification, Permission, RequestRepository,
};

use super::{AuditTrail, Notifier};
use crate::auth::AuthUser;

pub struct RequestService<R: RequestRepository, B: BeneficiaryRepository> {
    repo: Arc<R>,
    beneficiaries: Arc<B>,
    audit: AuditTrail,
    notifier: Notifier,
}

impl<R: RequestRepository, B: BeneficiaryRepository> RequestService<R, B> {
    pub fn new(repo: Arc<R>, beneficiaries: Arc<B>, audit: AuditTrail, notifier: Notifier) -> Self {
        Self {
            repo,
            beneficiaries,
            audit,
            notifier,
        }
    }

    /// Beneficiary profile of the caller; a beneficiary user without one may not proceed
    async fn own_profile(&self, user: &AuthUser) -> Result<Beneficiary, DomainError> {
        self.beneficiaries
            .find_by_user(user.id)
            .await?
            .ok_or_else(|| DomainError::forbidden("no beneficiary profile is linked to this user"))
    }

    fn is_staff(user: &AuthUser) -> bool {
        user.can(Permission::ViewAllBeneficiaries) || user.can(Permission::ApproveRequests)
    }

    pub async fn list(
        &self,
        user: &AuthUser,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<BeneficiaryRequest>, DomainError> {
        if Self::is_staff(user) {
            return self.repo.find_all(status).await;
        }
        let profile = self.own_profile(user).await?;
        let requests = self.repo.find_by_beneficiary(profile.id).await?;
        Ok(requests
            .into_iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .collect())
    }

    pub async fn get(&self, id: Uuid, user: &AuthUser) -> Result<BeneficiaryRequest, DomainError> {
        let request = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("BeneficiaryRequest", id))?;
        if !Self::is_staff(user) && self.own_profile(user).await?.id != request.beneficiary_id {
            return Err(DomainError::forbidden("request belongs to another beneficiary"));
        }
        Ok(request)
    }

    pub async fn create(
        &self,
        input: NewBeneficiaryRequest,
        user: &AuthUser,
    ) -> Result<BeneficiaryRequest, DomainError> {
        let beneficiary_id = if user.can(Permission::ManageBeneficiaries) {
            match input.beneficiary_id {
                Some(id) => id,
                None => self.own_profile(user).await?.id,
            }
        } else {
            // Beneficiaries always file for themselves
            self.own_profile(user).await?.id
        };
        self.beneficiaries
            .find_by_id(beneficiary_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Beneficiary", beneficiary_id))?;

        let request = BeneficiaryRequest::new(
            beneficiary_id,
            input.request_type,
            input.description,
            input.amount,
        )?;
        let saved = self.repo.save(&request).await?;
        tracing::info!("New {} request {} from {}", saved.request_type, saved.id, beneficiary_id);
        Ok(saved)
    }

    pub async fn act(
        &self,
        id: Uuid,
        action: ApprovalAction,
        note: Option<String>,
        user: &AuthUser,
    ) -> Result<BeneficiaryRequest, DomainError> {
        let current = self.get(id, user).await?;
        match action.required_permission() {
            Some(permission) if !user.can(permission) => {
                return Err(DomainError::forbidden(format!(
                    "role {} cannot {action} requests",
                    user.role
                )));
            }
            None if user.is_beneficiary() => {
                // `get` already confirmed ownership
            }
            None if !user.can(Permission::ManageBeneficiaries) => {
                return Err(DomainError::forbidden(format!(
                    "role {} cannot {action} requests",
                    user.role
                )));
            }
            _ => {}
        }

        let from = current.status;
        let saved = self.repo.save(&current.decide(action, user.id, note)?).await?;

        tracing::info!("Request {} {} -> {}", id, from, saved.status);
        self.audit
            .record(
                user.actor(),
                action.as_str(),
                "beneficiary_request",
                Some(id),
                json!({ "from": from, "to": saved.status, "note": saved.decision_note }),
            )
            .await;

        if matches!(action, ApprovalAction::Approve | ApprovalAction::Reject) {
            let beneficiary = self.beneficiaries.find_by_id(saved.beneficiary_id).await?;
            let verdict = if action == ApprovalAction::Approve {
                "قبول"
            } else {
                "رفض"
            };
            self.notifier
                .send(Notification {
                    user_id: beneficiary.and_then(|b| b.user_id),
                    beneficiary_id: Some(saved.beneficiary_id),
                    title: "تحديث حالة الطلب".to_string(),
                    message: format!("تم {verdict} طلبك"),
                    kind: "request_decided".to_string(),
                })
                .await;
        }
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{MemoryAudit, MemoryBeneficiaries, MemoryRequests, RecordingFunctions};
    use rust_decimal::Decimal;
    use waqf::domain::{BeneficiaryCategory, NewBeneficiary, RequestType};
    use waqf::UserRole;

    struct Fixture {
        service: RequestService<MemoryRequests, MemoryBeneficiaries>,
        functions: Arc<RecordingFunctions>,
        audit: Arc<MemoryAudit>,
        owner: AuthUser,
    }

    fn user(role: UserRole) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: None,
            role,
        }
    }

    fn fixture() -> Fixture {
        let owner = user(UserRole::Beneficiary);
        let beneficiaries = Arc::new(MemoryBeneficiaries::default());
        beneficiaries.insert(
            Beneficiary::register(NewBeneficiary {
                full_name: "فاطمة".to_string(),
                national_id: "1234567890".to_string(),
                phone: "0551234567".to_string(),
                email: None,
                iban: None,
                category: BeneficiaryCategory::Daughter,
                user_id: Some(owner.id),
            })
            .unwrap(),
        );
        let functions = Arc::new(RecordingFunctions::default());
        let audit = Arc::new(MemoryAudit::default());
        let service = RequestService::new(
            Arc::new(MemoryRequests::default()),
            beneficiaries,
            AuditTrail::new(audit.clone()),
            Notifier::new(Some(functions.clone())),
        );
        Fixture {
            service,
            functions,
            audit,
            owner,
        }
    }

    fn aid() -> NewBeneficiaryRequest {
        NewBeneficiaryRequest {
            beneficiary_id: None,
            request_type: RequestType::FinancialAid,
            description: "رسوم جامعية".to_string(),
            amount: Some(Decimal::from(8000)),
        }
    }

    #[tokio::test]
    async fn test_approval_notifies_beneficiary() {
        let f = fixture();
        let request = f.service.create(aid(), &f.owner).await.unwrap();
        assert_eq!(request.status, ApprovalStatus::Pending);

        let nazer = user(UserRole::Nazer);
        let approved = f
            .service
            .act(request.id, ApprovalAction::Approve, Some("معتمد".to_string()), &nazer)
            .await
            .unwrap();
        assert_eq!(approved.status, ApprovalStatus::Approved);
        assert_eq!(approved.decided_by, Some(nazer.id));
        assert_eq!(f.functions.calls(), vec!["send-notification".to_string()]);
        assert_eq!(f.audit.actions(), vec!["approve:beneficiary_request".to_string()]);
    }

    #[tokio::test]
    async fn test_beneficiary_cannot_approve() {
        let f = fixture();
        let request = f.service.create(aid(), &f.owner).await.unwrap();
        let result = f
            .service
            .act(request.id, ApprovalAction::Approve, None, &f.owner)
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
        assert!(f.functions.calls().is_empty());
    }

    #[tokio::test]
    async fn test_other_beneficiary_cannot_read() {
        let f = fixture();
        let request = f.service.create(aid(), &f.owner).await.unwrap();
        let stranger = user(UserRole::Beneficiary);
        assert!(f.service.get(request.id, &stranger).await.is_err());
        assert!(f.service.list(&stranger, None).await.is_err());
        assert_eq!(f.service.list(&f.owner, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_transition_conflicts() {
        let f = fixture();
        let request = f.service.create(aid(), &f.owner).await.unwrap();
        let cashier = user(UserRole::Cashier);
        let result = f
            .service
            .act(request.id, ApprovalAction::Complete, None, &cashier)
            .await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }
}
