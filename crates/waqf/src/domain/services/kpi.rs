//! KPI reduction
//!
//! Each slice of the unified snapshot is reduced independently from the
//! rows of one table, so a failed read only zeroes its own slice.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::accounting::{self, round2};
use crate::domain::entities::{
    Beneficiary, BeneficiaryRequest, Contract, ContractStatus, Distribution, Fund, Loan,
    LoanStatus, PaymentStatus, PostedLine, Property, PropertyStatus, RentalPayment,
};
use crate::domain::value_objects::ApprovalStatus;

/// Days ahead in which an active contract counts as expiring
pub const EXPIRING_WINDOW_DAYS: i64 = 30;

text_enum! {
    /// The independent reads that feed the snapshot
    pub enum KpiSlice {
        Beneficiaries => "beneficiaries",
        Properties => "properties",
        Contracts => "contracts",
        Payments => "payments",
        Journal => "journal",
        Funds => "funds",
        Loans => "loans",
        Requests => "requests",
        Distributions => "distributions",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BeneficiaryKpis {
    pub total_beneficiaries: i64,
    pub active_beneficiaries: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PropertyKpis {
    pub total_properties: i64,
    pub rented_properties: i64,
    /// Percentage of properties currently rented
    pub occupancy_rate: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContractKpis {
    pub active_contracts: i64,
    pub expiring_contracts: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CollectionKpis {
    pub collected_rent: Decimal,
    pub pending_rent: Decimal,
    pub overdue_payments: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IncomeKpis {
    pub total_revenues: Decimal,
    pub total_expenses: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FundKpis {
    pub funds_balance: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoanKpis {
    pub active_loans: i64,
    pub defaulted_loans: i64,
    /// Unpaid principal of active and defaulted loans
    pub outstanding_loans: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RequestKpis {
    pub pending_requests: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DistributionKpis {
    pub distributed_total: Decimal,
    pub distributions_awaiting_approval: i64,
}

/// Unified KPI record; serialized flat
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KpiSnapshot {
    #[serde(flatten)]
    pub beneficiaries: BeneficiaryKpis,
    #[serde(flatten)]
    pub properties: PropertyKpis,
    #[serde(flatten)]
    pub contracts: ContractKpis,
    #[serde(flatten)]
    pub collections: CollectionKpis,
    #[serde(flatten)]
    pub income: IncomeKpis,
    #[serde(flatten)]
    pub funds: FundKpis,
    #[serde(flatten)]
    pub loans: LoanKpis,
    #[serde(flatten)]
    pub requests: RequestKpis,
    #[serde(flatten)]
    pub distributions: DistributionKpis,
    /// Slices whose read failed and were reported as zero
    pub failed_slices: Vec<KpiSlice>,
    pub generated_at: DateTime<Utc>,
}

impl KpiSnapshot {
    pub fn empty(generated_at: DateTime<Utc>) -> Self {
        Self {
            beneficiaries: BeneficiaryKpis::default(),
            properties: PropertyKpis::default(),
            contracts: ContractKpis::default(),
            collections: CollectionKpis::default(),
            income: IncomeKpis::default(),
            funds: FundKpis::default(),
            loans: LoanKpis::default(),
            requests: RequestKpis::default(),
            distributions: DistributionKpis::default(),
            failed_slices: Vec::new(),
            generated_at,
        }
    }

    pub fn is_partial(&self) -> bool {
        !self.failed_slices.is_empty()
    }
}

fn count<T>(rows: &[T], pred: impl Fn(&T) -> bool) -> i64 {
    rows.iter().filter(|r| pred(r)).count() as i64
}

pub fn reduce_beneficiaries(rows: &[Beneficiary]) -> BeneficiaryKpis {
    BeneficiaryKpis {
        total_beneficiaries: rows.len() as i64,
        active_beneficiaries: count(rows, |b| b.is_active()),
    }
}

pub fn reduce_properties(rows: &[Property]) -> PropertyKpis {
    let total = rows.len() as i64;
    let rented = count(rows, |p| p.status == PropertyStatus::Rented);
    let occupancy_rate = if total == 0 {
        Decimal::ZERO
    } else {
        round2(Decimal::from(rented) * Decimal::ONE_HUNDRED / Decimal::from(total))
    };
    PropertyKpis {
        total_properties: total,
        rented_properties: rented,
        occupancy_rate,
    }
}

pub fn reduce_contracts(rows: &[Contract], today: NaiveDate) -> ContractKpis {
    ContractKpis {
        active_contracts: count(rows, |c| c.status_on(today) == ContractStatus::Active),
        expiring_contracts: count(rows, |c| c.is_expiring_within(EXPIRING_WINDOW_DAYS, today)),
    }
}

/// Collected and pending figures exclude VAT
pub fn reduce_payments(rows: &[RentalPayment], today: NaiveDate) -> CollectionKpis {
    CollectionKpis {
        collected_rent: rows
            .iter()
            .filter(|p| p.status == PaymentStatus::Paid)
            .map(|p| p.amount)
            .sum(),
        pending_rent: rows
            .iter()
            .filter(|p| p.is_outstanding())
            .map(|p| p.amount)
            .sum(),
        overdue_payments: count(rows, |p| p.status_on(today) == PaymentStatus::Overdue),
    }
}

pub fn reduce_journal(rows: &[PostedLine]) -> IncomeKpis {
    let statement = accounting::income_statement(rows);
    IncomeKpis {
        total_revenues: statement.revenues,
        total_expenses: statement.expenses,
        net_income: statement.net_income,
    }
}

pub fn reduce_funds(rows: &[Fund]) -> FundKpis {
    FundKpis {
        funds_balance: rows.iter().map(|f| f.balance).sum(),
    }
}

pub fn reduce_loans(rows: &[Loan], today: NaiveDate) -> LoanKpis {
    LoanKpis {
        active_loans: count(rows, |l| l.status_on(today) == LoanStatus::Active),
        defaulted_loans: count(rows, |l| l.status_on(today) == LoanStatus::Defaulted),
        outstanding_loans: rows
            .iter()
            .filter(|l| l.status != LoanStatus::Paid)
            .map(|l| l.outstanding())
            .sum(),
    }
}

pub fn reduce_requests(rows: &[BeneficiaryRequest]) -> RequestKpis {
    RequestKpis {
        pending_requests: count(rows, |r| r.status == ApprovalStatus::Pending),
    }
}

pub fn reduce_distributions(rows: &[Distribution]) -> DistributionKpis {
    DistributionKpis {
        distributed_total: rows
            .iter()
            .filter(|d| d.status == ApprovalStatus::Completed)
            .map(|d| d.total_amount)
            .sum(),
        distributions_awaiting_approval: count(rows, |d| d.status == ApprovalStatus::Pending),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        NewContract, NewLoan, NewProperty, NewRentalPayment, PropertyType,
    };
    use crate::domain::value_objects::Frequency;
    use uuid::Uuid;

    fn property(status: PropertyStatus) -> Property {
        let mut p = Property::new(NewProperty {
            name: "عمارة".to_string(),
            location: "الرياض".to_string(),
            property_type: PropertyType::Residential,
            units: Some(4),
            annual_rent: Decimal::from(100000),
        })
        .unwrap();
        p.status = status;
        p
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment(amount: i64, status: PaymentStatus) -> RentalPayment {
        let mut p = RentalPayment::new(
            Uuid::new_v4(),
            NewRentalPayment {
                due_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                amount: Decimal::from(amount),
                apply_vat: true,
            },
        )
        .unwrap();
        p.status = status;
        p
    }

    #[test]
    fn test_occupancy_rate() {
        let rows = vec![
            property(PropertyStatus::Rented),
            property(PropertyStatus::Rented),
            property(PropertyStatus::Vacant),
        ];
        let kpis = reduce_properties(&rows);
        assert_eq!(kpis.rented_properties, 2);
        assert_eq!(kpis.occupancy_rate, Decimal::new(6667, 2));
        assert_eq!(reduce_properties(&[]).occupancy_rate, Decimal::ZERO);
    }

    #[test]
    fn test_payments_exclude_vat() {
        let rows = vec![
            payment(1000, PaymentStatus::Paid),
            payment(500, PaymentStatus::Pending),
            payment(250, PaymentStatus::Overdue),
            payment(999, PaymentStatus::Cancelled),
        ];
        let kpis = reduce_payments(&rows, day(2026, 1, 15));
        assert_eq!(kpis.collected_rent, Decimal::from(1000));
        assert_eq!(kpis.pending_rent, Decimal::from(750));
        assert_eq!(kpis.overdue_payments, 1);
    }

    #[test]
    fn test_past_due_pending_payment_counts_as_overdue() {
        let rows = vec![payment(1000, PaymentStatus::Pending)];
        let before = reduce_payments(&rows, day(2026, 2, 1));
        assert_eq!(before.overdue_payments, 0);

        let after = reduce_payments(&rows, day(2026, 10, 16));
        assert_eq!(after.overdue_payments, 1);
        assert_eq!(after.pending_rent, Decimal::from(1000));
    }

    #[test]
    fn test_ended_contract_is_not_active() {
        let contract = Contract::new(NewContract {
            contract_number: "C-100".to_string(),
            property_id: Uuid::new_v4(),
            tenant_name: "مؤسسة النخيل".to_string(),
            tenant_phone: "0551234567".to_string(),
            start_date: day(2023, 1, 1),
            end_date: day(2024, 1, 1),
            annual_rent: Decimal::from(50000),
            payment_frequency: Frequency::Annual,
        })
        .unwrap();

        let rows = vec![contract];
        assert_eq!(reduce_contracts(&rows, day(2023, 6, 1)).active_contracts, 1);
        let kpis = reduce_contracts(&rows, day(2026, 10, 16));
        assert_eq!(kpis.active_contracts, 0);
        assert_eq!(kpis.expiring_contracts, 0);
    }

    #[test]
    fn test_overdue_loan_counts_as_defaulted() {
        let loan = Loan::new(NewLoan {
            beneficiary_id: Uuid::new_v4(),
            principal: Decimal::from(5000),
            start_date: day(2025, 1, 1),
            due_date: day(2026, 1, 1),
        })
        .unwrap()
        .repay(Decimal::from(1000))
        .unwrap();

        let kpis = reduce_loans(&[loan], day(2026, 10, 16));
        assert_eq!(kpis.active_loans, 0);
        assert_eq!(kpis.defaulted_loans, 1);
        assert_eq!(kpis.outstanding_loans, Decimal::from(4000));
    }

    #[test]
    fn test_snapshot_serializes_flat() {
        let mut snapshot = KpiSnapshot::empty(Utc::now());
        snapshot.requests.pending_requests = 4;
        snapshot.failed_slices.push(KpiSlice::Loans);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["pending_requests"], 4);
        assert_eq!(json["failed_slices"][0], "loans");
        assert!(json.get("requests").is_none());
        assert!(snapshot.is_partial());
    }
}
