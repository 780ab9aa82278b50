//! Treasury Application Service

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use waqf::domain::{Fund, Loan, NewFund, NewLoan};
use waqf::{BeneficiaryRepository, DomainError, TreasuryRepository};

use super::AuditTrail;

pub struct TreasuryService<T: TreasuryRepository, B: BeneficiaryRepository> {
    repo: Arc<T>,
    beneficiaries: Arc<B>,
    audit: AuditTrail,
}

impl<T: TreasuryRepository, B: BeneficiaryRepository> TreasuryService<T, B> {
    pub fn new(repo: Arc<T>, beneficiaries: Arc<B>, audit: AuditTrail) -> Self {
        Self {
            repo,
            beneficiaries,
            audit,
        }
    }

    pub async fn funds(&self) -> Result<Vec<Fund>, DomainError> {
        self.repo.find_funds().await
    }

    pub async fn create_fund(&self, input: NewFund) -> Result<Fund, DomainError> {
        let saved = self.repo.save_fund(&Fund::new(input)?).await?;
        tracing::info!("Created fund {} ({})", saved.name, saved.fund_type);
        Ok(saved)
    }

    pub async fn loans(&self, beneficiary_id: Option<Uuid>) -> Result<Vec<Loan>, DomainError> {
        self.repo.find_loans(beneficiary_id).await
    }

    pub async fn loan(&self, id: Uuid) -> Result<Loan, DomainError> {
        self.repo
            .find_loan(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Loan", id))
    }

    pub async fn grant_loan(&self, input: NewLoan, actor: Option<Uuid>) -> Result<Loan, DomainError> {
        let beneficiary = self
            .beneficiaries
            .find_by_id(input.beneficiary_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Beneficiary", input.beneficiary_id))?;
        if !beneficiary.is_active() {
            return Err(DomainError::conflict(format!(
                "Cannot grant a loan to a beneficiary who is {}",
                beneficiary.status
            )));
        }

        let saved = self.repo.save_loan(&Loan::new(input)?).await?;
        tracing::info!("Granted loan {} of {} to {}", saved.id, saved.principal, saved.beneficiary_id);
        self.audit
            .record(actor, "grant", "loan", Some(saved.id), json!({ "principal": saved.principal }))
            .await;
        Ok(saved)
    }

    pub async fn repay_loan(
        &self,
        id: Uuid,
        amount: Decimal,
        actor: Option<Uuid>,
    ) -> Result<Loan, DomainError> {
        let saved = self.repo.save_loan(&self.loan(id).await?.repay(amount)?).await?;
        tracing::info!("Loan {} repaid {} (outstanding {})", id, amount, saved.outstanding());
        self.audit
            .record(actor, "repay", "loan", Some(id), json!({ "amount": amount, "status": saved.status }))
            .await;
        Ok(saved)
    }

    /// Persist the defaulted status of active loans past their due date
    pub async fn mark_defaulted(&self, today: NaiveDate) -> Result<u64, DomainError> {
        let changed = self.repo.mark_defaulted(today).await?;
        if changed > 0 {
            tracing::info!("Marked {} loans defaulted", changed);
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{beneficiary, MemoryAudit, MemoryBeneficiaries, MemoryTreasury};
    use waqf::domain::{BeneficiaryStatus, LoanStatus};

    fn service() -> (
        TreasuryService<MemoryTreasury, MemoryBeneficiaries>,
        Arc<MemoryBeneficiaries>,
        Arc<MemoryAudit>,
    ) {
        let beneficiaries = Arc::new(MemoryBeneficiaries::default());
        let audit = Arc::new(MemoryAudit::default());
        let service = TreasuryService::new(
            Arc::new(MemoryTreasury::default()),
            beneficiaries.clone(),
            AuditTrail::new(audit.clone()),
        );
        (service, beneficiaries, audit)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_loan(beneficiary_id: Uuid) -> NewLoan {
        NewLoan {
            beneficiary_id,
            principal: Decimal::from(10000),
            start_date: day(2026, 1, 1),
            due_date: day(2026, 12, 31),
        }
    }

    #[tokio::test]
    async fn test_repay_beyond_principal_is_rejected() {
        let (service, beneficiaries, audit) = service();
        let b = beneficiary();
        beneficiaries.insert(b.clone());

        let loan = service.grant_loan(new_loan(b.id), None).await.unwrap();
        let loan = service.repay_loan(loan.id, Decimal::from(7500), None).await.unwrap();
        assert_eq!(loan.outstanding(), Decimal::from(2500));

        let result = service.repay_loan(loan.id, Decimal::from(2501), None).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(service.loan(loan.id).await.unwrap().paid_amount, Decimal::from(7500));

        let settled = service.repay_loan(loan.id, Decimal::from(2500), None).await.unwrap();
        assert_eq!(settled.status, LoanStatus::Paid);
        assert_eq!(audit.actions(), vec!["grant:loan", "repay:loan", "repay:loan"]);
    }

    #[tokio::test]
    async fn test_loan_needs_active_beneficiary() {
        let (service, beneficiaries, _) = service();
        let mut b = beneficiary();
        b.status = BeneficiaryStatus::Suspended;
        beneficiaries.insert(b.clone());

        let result = service.grant_loan(new_loan(b.id), None).await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_mark_defaulted_after_due_date() {
        let (service, beneficiaries, _) = service();
        let b = beneficiary();
        beneficiaries.insert(b.clone());
        let loan = service.grant_loan(new_loan(b.id), None).await.unwrap();

        assert_eq!(service.mark_defaulted(day(2026, 12, 31)).await.unwrap(), 0);
        assert_eq!(service.mark_defaulted(day(2027, 1, 1)).await.unwrap(), 1);
        assert_eq!(service.loan(loan.id).await.unwrap().status, LoanStatus::Defaulted);
        assert_eq!(service.mark_defaulted(day(2027, 1, 2)).await.unwrap(), 0);
    }
}
