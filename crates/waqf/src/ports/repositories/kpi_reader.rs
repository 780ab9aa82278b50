//! KPI Reader Port
//!
//! Nine independent reads feeding the unified KPI snapshot. Each call is
//! expected to be a single query; there is no consistency across calls.

use async_trait::async_trait;

use crate::domain::{
    errors::DomainError, Beneficiary, BeneficiaryRequest, Contract, Distribution, Fund, Loan,
    PostedLine, Property, RentalPayment,
};

#[async_trait]
pub trait KpiReader: Send + Sync {
    async fn beneficiaries(&self) -> Result<Vec<Beneficiary>, DomainError>;

    async fn properties(&self) -> Result<Vec<Property>, DomainError>;

    async fn contracts(&self) -> Result<Vec<Contract>, DomainError>;

    async fn payments(&self) -> Result<Vec<RentalPayment>, DomainError>;

    async fn posted_lines(&self) -> Result<Vec<PostedLine>, DomainError>;

    async fn funds(&self) -> Result<Vec<Fund>, DomainError>;

    async fn loans(&self) -> Result<Vec<Loan>, DomainError>;

    async fn requests(&self) -> Result<Vec<BeneficiaryRequest>, DomainError>;

    async fn distributions(&self) -> Result<Vec<Distribution>, DomainError>;
}
