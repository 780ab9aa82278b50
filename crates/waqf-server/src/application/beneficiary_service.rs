//! Beneficiary Application Service

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use waqf::domain::{BeneficiaryStatus, BeneficiaryUpdate, NewBeneficiary};
use waqf::{Beneficiary, BeneficiaryRepository, DomainError};

use super::AuditTrail;

pub struct BeneficiaryService<R: BeneficiaryRepository> {
    repo: Arc<R>,
    audit: AuditTrail,
}

impl<R: BeneficiaryRepository> BeneficiaryService<R> {
    pub fn new(repo: Arc<R>, audit: AuditTrail) -> Self {
        Self { repo, audit }
    }

    pub async fn list(
        &self,
        status: Option<BeneficiaryStatus>,
    ) -> Result<Vec<Beneficiary>, DomainError> {
        self.repo.find_all(status).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Beneficiary, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Beneficiary", id))
    }

    /// Profile linked to an auth user
    pub async fn for_user(&self, user_id: Uuid) -> Result<Option<Beneficiary>, DomainError> {
        self.repo.find_by_user(user_id).await
    }

    pub async fn create(
        &self,
        input: NewBeneficiary,
        actor: Option<Uuid>,
    ) -> Result<Beneficiary, DomainError> {
        let beneficiary = Beneficiary::register(input)?;
        let saved = self.repo.save(&beneficiary).await?;

        tracing::info!("Registered beneficiary: {} ({})", saved.full_name, saved.id);
        self.audit
            .record(actor, "create", "beneficiary", Some(saved.id), json!({ "category": saved.category }))
            .await;
        Ok(saved)
    }

    pub async fn update(
        &self,
        id: Uuid,
        update: BeneficiaryUpdate,
        actor: Option<Uuid>,
    ) -> Result<Beneficiary, DomainError> {
        let current = self.get(id).await?;
        let previous_status = current.status;
        let saved = self.repo.save(&current.apply(update)?).await?;

        if saved.status != previous_status {
            tracing::info!("Beneficiary {} status {} -> {}", id, previous_status, saved.status);
            self.audit
                .record(
                    actor,
                    "change_status",
                    "beneficiary",
                    Some(id),
                    json!({ "from": previous_status, "to": saved.status }),
                )
                .await;
        }
        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid, actor: Option<Uuid>) -> Result<bool, DomainError> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            tracing::info!("Deleted beneficiary: {}", id);
            self.audit
                .record(actor, "delete", "beneficiary", Some(id), json!({}))
                .await;
        }
        Ok(deleted)
    }
}
