//! Contract Repository Port
//!
//! Rental contracts and the payments scheduled against them.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Contract, RentalPayment};

#[async_trait]
pub trait ContractRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contract>, DomainError>;

    /// All contracts, optionally only those of one property
    async fn find_all(&self, property_id: Option<Uuid>) -> Result<Vec<Contract>, DomainError>;

    /// Save a contract (insert or update)
    async fn save(&self, contract: &Contract) -> Result<Contract, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Mark active contracts that ended before `today` as expired, returning them
    async fn expire_ended(&self, today: NaiveDate) -> Result<Vec<Contract>, DomainError>;

    // --- Payments ---

    async fn find_payment(&self, id: Uuid) -> Result<Option<RentalPayment>, DomainError>;

    /// Payments of one contract, or all payments
    async fn find_payments(
        &self,
        contract_id: Option<Uuid>,
    ) -> Result<Vec<RentalPayment>, DomainError>;

    /// Outstanding payments due between `from` and `to` (inclusive)
    async fn find_payments_due(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RentalPayment>, DomainError>;

    /// Mark pending payments due before `today` as overdue; returns how many changed
    async fn mark_overdue(&self, today: NaiveDate) -> Result<u64, DomainError>;

    /// Save a payment (insert or update)
    async fn save_payment(&self, payment: &RentalPayment) -> Result<RentalPayment, DomainError>;
}
