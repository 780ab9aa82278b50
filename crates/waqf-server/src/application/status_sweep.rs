//! Status sweep - Date-driven status transitions
//!
//! Pending rent past its due date becomes overdue, active contracts past
//! their end date expire (releasing their property), and active loans past
//! their due date default. Runs once at startup and then on an interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tokio::time::interval;

use waqf::{BeneficiaryRepository, ContractRepository, DomainError, PropertyRepository, TreasuryRepository};

use super::{RentalService, TreasuryService};

/// Sweep configuration
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Interval between sweeps
    pub interval: Duration,
    pub enabled: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600), // 1 hour
            enabled: true,
        }
    }
}

impl SweepConfig {
    /// `0` disables the sweep
    pub fn from_secs(secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(secs.max(1)),
            enabled: secs > 0,
        }
    }
}

/// Rows moved by one sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub overdue_payments: u64,
    pub expired_contracts: usize,
    pub defaulted_loans: u64,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub struct StatusSweeper<P, C, T, B>
where
    P: PropertyRepository,
    C: ContractRepository,
    T: TreasuryRepository,
    B: BeneficiaryRepository,
{
    rental: Arc<RentalService<P, C>>,
    treasury: Arc<TreasuryService<T, B>>,
    config: SweepConfig,
}

impl<P, C, T, B> StatusSweeper<P, C, T, B>
where
    P: PropertyRepository + 'static,
    C: ContractRepository + 'static,
    T: TreasuryRepository + 'static,
    B: BeneficiaryRepository + 'static,
{
    pub fn new(
        rental: Arc<RentalService<P, C>>,
        treasury: Arc<TreasuryService<T, B>>,
        config: SweepConfig,
    ) -> Self {
        Self {
            rental,
            treasury,
            config,
        }
    }

    /// Apply every transition due on `today`
    pub async fn run_once(&self, today: NaiveDate) -> Result<SweepReport, DomainError> {
        Ok(SweepReport {
            overdue_payments: self.rental.mark_overdue(today).await?,
            expired_contracts: self.rental.expire_contracts(today).await?.len(),
            defaulted_loans: self.treasury.mark_defaulted(today).await?,
        })
    }

    /// Start the sweep (runs in background)
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(self) {
        if !self.config.enabled {
            tracing::info!("📅 Status sweep disabled");
            return;
        }

        tracing::info!("📅 Status sweep started (interval: {:?})", self.config.interval);

        // The first tick fires immediately so a restart catches up at once
        let mut ticker = interval(self.config.interval);
        loop {
            ticker.tick().await;

            let today = Utc::now().date_naive();
            match self.run_once(today).await {
                Ok(report) if report.is_empty() => {
                    tracing::debug!("🔄 Status sweep for {today}: nothing to change");
                }
                Ok(report) => tracing::info!(
                    "🔄 Status sweep for {}: {} payments overdue, {} contracts expired, {} loans defaulted",
                    today,
                    report.overdue_payments,
                    report.expired_contracts,
                    report.defaulted_loans
                ),
                Err(e) => tracing::warn!("  ❌ Status sweep failed: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        beneficiary, MemoryAudit, MemoryBeneficiaries, MemoryContracts, MemoryProperties,
        MemoryTreasury,
    };
    use crate::application::AuditTrail;
    use rust_decimal::Decimal;
    use waqf::domain::{
        ContractStatus, Frequency, LoanStatus, NewContract, NewLoan, NewProperty, NewRentalPayment,
        PaymentStatus, PropertyStatus, PropertyType,
    };

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_zero_interval_disables() {
        assert!(!SweepConfig::from_secs(0).enabled);
        let config = SweepConfig::from_secs(600);
        assert!(config.enabled);
        assert_eq!(config.interval, Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_sweep_applies_date_transitions() {
        let audit = AuditTrail::new(Arc::new(MemoryAudit::default()));
        let beneficiaries = Arc::new(MemoryBeneficiaries::default());
        let rental = Arc::new(RentalService::new(
            Arc::new(MemoryProperties::default()),
            Arc::new(MemoryContracts::default()),
            audit.clone(),
        ));
        let treasury = Arc::new(TreasuryService::new(
            Arc::new(MemoryTreasury::default()),
            beneficiaries.clone(),
            audit,
        ));
        let sweeper = StatusSweeper::new(rental.clone(), treasury.clone(), SweepConfig::default());

        let property = rental
            .create_property(NewProperty {
                name: "محلات السوق".to_string(),
                location: "مكة".to_string(),
                property_type: PropertyType::Commercial,
                units: Some(4),
                annual_rent: Decimal::from(60000),
            })
            .await
            .unwrap();
        let contract = rental
            .create_contract(NewContract {
                contract_number: "C-2023-7".to_string(),
                property_id: property.id,
                tenant_name: "مؤسسة الريان".to_string(),
                tenant_phone: "0551234567".to_string(),
                start_date: day(2023, 1, 1),
                end_date: day(2024, 1, 1),
                annual_rent: Decimal::from(60000),
                payment_frequency: Frequency::Annual,
            })
            .await
            .unwrap();
        let payment = rental
            .record_payment(
                contract.id,
                NewRentalPayment {
                    due_date: day(2024, 1, 1),
                    amount: Decimal::from(60000),
                    apply_vat: true,
                },
            )
            .await
            .unwrap();

        let b = beneficiary();
        beneficiaries.insert(b.clone());
        let loan = treasury
            .grant_loan(
                NewLoan {
                    beneficiary_id: b.id,
                    principal: Decimal::from(5000),
                    start_date: day(2025, 1, 1),
                    due_date: day(2026, 1, 1),
                },
                None,
            )
            .await
            .unwrap();

        let report = sweeper.run_once(day(2026, 10, 16)).await.unwrap();
        assert_eq!(
            report,
            SweepReport {
                overdue_payments: 1,
                expired_contracts: 1,
                defaulted_loans: 1,
            }
        );

        let payments = rental.list_payments(Some(contract.id)).await.unwrap();
        assert_eq!(payments[0].id, payment.id);
        assert_eq!(payments[0].status, PaymentStatus::Overdue);
        assert_eq!(rental.get_contract(contract.id).await.unwrap().status, ContractStatus::Expired);
        assert_eq!(rental.get_property(property.id).await.unwrap().status, PropertyStatus::Vacant);
        assert_eq!(treasury.loan(loan.id).await.unwrap().status, LoanStatus::Defaulted);

        // Nothing left to move
        assert!(sweeper.run_once(day(2026, 10, 16)).await.unwrap().is_empty());
    }
}
