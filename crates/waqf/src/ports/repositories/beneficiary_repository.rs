//! Beneficiary Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Beneficiary, BeneficiaryStatus};

/// Repository interface for Beneficiary entities
#[async_trait]
pub trait BeneficiaryRepository: Send + Sync {
    /// Find a beneficiary by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Beneficiary>, DomainError>;

    /// Find the profile linked to an auth user
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Beneficiary>, DomainError>;

    /// Find all beneficiaries, optionally filtered by status
    async fn find_all(
        &self,
        status: Option<BeneficiaryStatus>,
    ) -> Result<Vec<Beneficiary>, DomainError>;

    /// Save a beneficiary (insert or update)
    async fn save(&self, beneficiary: &Beneficiary) -> Result<Beneficiary, DomainError>;

    /// Delete a beneficiary by ID
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
