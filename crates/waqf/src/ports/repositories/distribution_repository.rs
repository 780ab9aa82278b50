//! Distribution Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    errors::DomainError, Distribution, DistributionSettings, DistributionShare, NewDistribution,
};

#[async_trait]
pub trait DistributionRepository: Send + Sync {
    /// The single settings record, if one was ever saved
    async fn find_settings(&self) -> Result<Option<DistributionSettings>, DomainError>;

    async fn save_settings(
        &self,
        settings: &DistributionSettings,
    ) -> Result<DistributionSettings, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Distribution>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Distribution>, DomainError>;

    /// Persist a status change
    async fn save(&self, distribution: &Distribution) -> Result<Distribution, DomainError>;

    /// Run the allocation procedure and return the new distribution
    async fn allocate(
        &self,
        input: &NewDistribution,
        created_by: Option<Uuid>,
    ) -> Result<Distribution, DomainError>;

    async fn find_shares(&self, distribution_id: Uuid)
        -> Result<Vec<DistributionShare>, DomainError>;

    async fn find_shares_by_beneficiary(
        &self,
        beneficiary_id: Uuid,
    ) -> Result<Vec<DistributionShare>, DomainError>;
}
