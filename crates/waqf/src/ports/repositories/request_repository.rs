//! BeneficiaryRequest Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, ApprovalStatus, BeneficiaryRequest};

#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BeneficiaryRequest>, DomainError>;

    /// All requests, newest first, optionally filtered by status
    async fn find_all(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<BeneficiaryRequest>, DomainError>;

    async fn find_by_beneficiary(
        &self,
        beneficiary_id: Uuid,
    ) -> Result<Vec<BeneficiaryRequest>, DomainError>;

    /// Save a request (insert or update)
    async fn save(&self, request: &BeneficiaryRequest) -> Result<BeneficiaryRequest, DomainError>;
}
