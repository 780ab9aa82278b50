//! Treasury Repository Port

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Fund, Loan};

#[async_trait]
pub trait TreasuryRepository: Send + Sync {
    async fn find_funds(&self) -> Result<Vec<Fund>, DomainError>;

    async fn save_fund(&self, fund: &Fund) -> Result<Fund, DomainError>;

    async fn find_loan(&self, id: Uuid) -> Result<Option<Loan>, DomainError>;

    /// All loans, or only those of one beneficiary
    async fn find_loans(&self, beneficiary_id: Option<Uuid>) -> Result<Vec<Loan>, DomainError>;

    async fn save_loan(&self, loan: &Loan) -> Result<Loan, DomainError>;

    /// Mark active loans due before `today` as defaulted; returns how many changed
    async fn mark_defaulted(&self, today: NaiveDate) -> Result<u64, DomainError>;
}
