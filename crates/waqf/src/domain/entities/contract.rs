//! Contract - Rental contracts and their payment schedule

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::services::{accounting, validation};
use crate::domain::value_objects::Frequency;

text_enum! {
    pub enum ContractStatus {
        Draft => "draft",
        Active => "active",
        Expired => "expired",
        Terminated => "terminated",
    }
}

text_enum! {
    pub enum PaymentStatus {
        Pending => "pending",
        Paid => "paid",
        Overdue => "overdue",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Contract {
    pub id: Uuid,
    pub contract_number: String,
    pub property_id: Uuid,
    pub tenant_name: String,
    pub tenant_phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub annual_rent: Decimal,
    pub payment_frequency: Frequency,
    pub status: ContractStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewContract {
    pub contract_number: String,
    pub property_id: Uuid,
    pub tenant_name: String,
    pub tenant_phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub annual_rent: Decimal,
    pub payment_frequency: Frequency,
}

impl Contract {
    pub fn new(input: NewContract) -> Result<Self, DomainError> {
        if input.contract_number.trim().is_empty() {
            return Err(DomainError::validation("contract_number is required"));
        }
        if input.tenant_name.trim().is_empty() {
            return Err(DomainError::validation("tenant_name is required"));
        }
        if input.end_date <= input.start_date {
            return Err(DomainError::validation("end_date must be after start_date"));
        }
        if input.annual_rent <= Decimal::ZERO {
            return Err(DomainError::validation("annual_rent must be positive"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            contract_number: input.contract_number.trim().to_string(),
            property_id: input.property_id,
            tenant_name: input.tenant_name.trim().to_string(),
            tenant_phone: validation::normalize_phone(&input.tenant_phone)?,
            start_date: input.start_date,
            end_date: input.end_date,
            annual_rent: input.annual_rent,
            payment_frequency: input.payment_frequency,
            status: ContractStatus::Active,
            created_at: Utc::now(),
        })
    }

    /// Rent due each period before VAT, rounded to halalas
    pub fn installment_amount(&self) -> Decimal {
        accounting::round2(
            self.annual_rent / Decimal::from(self.payment_frequency.periods_per_year()),
        )
    }

    /// Due date of each installment, from the start date up to (excluding) the end date
    pub fn installment_due_dates(&self) -> Vec<NaiveDate> {
        let step = self.payment_frequency.months();
        let mut dates = Vec::new();
        let mut k = 0;
        while let Some(due) = self.start_date.checked_add_months(Months::new(step * k)) {
            if due >= self.end_date {
                break;
            }
            dates.push(due);
            k += 1;
        }
        dates
    }

    /// Installments before VAT; the last one absorbs the rounding remainder so
    /// the schedule adds up to the rent for the periods it covers
    pub fn installment_schedule(&self) -> Vec<(NaiveDate, Decimal)> {
        let dates = self.installment_due_dates();
        let Some(last) = dates.len().checked_sub(1) else {
            return Vec::new();
        };
        let periods = Decimal::from(self.payment_frequency.periods_per_year());
        let total = accounting::round2(self.annual_rent * Decimal::from(dates.len() as u64) / periods);
        let each = self.installment_amount();
        let remainder = total - each * Decimal::from(last as u64);

        dates
            .into_iter()
            .enumerate()
            .map(|(i, due)| (due, if i == last { remainder } else { each }))
            .collect()
    }

    /// Stored status, with an active contract past its end date read as expired
    pub fn status_on(&self, today: NaiveDate) -> ContractStatus {
        if self.status == ContractStatus::Active && self.end_date < today {
            ContractStatus::Expired
        } else {
            self.status
        }
    }

    /// Active and ending within `days` of `today` (inclusive)
    pub fn is_expiring_within(&self, days: i64, today: NaiveDate) -> bool {
        self.status == ContractStatus::Active
            && self.end_date >= today
            && self.end_date <= today + Duration::days(days)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RentalPayment {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub vat_amount: Decimal,
    pub status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewRentalPayment {
    pub due_date: NaiveDate,
    pub amount: Decimal,
    /// Commercial rents carry VAT; residential rents are exempt
    #[serde(default)]
    pub apply_vat: bool,
}

impl RentalPayment {
    pub fn new(contract_id: Uuid, input: NewRentalPayment) -> Result<Self, DomainError> {
        if input.amount <= Decimal::ZERO {
            return Err(DomainError::validation("amount must be positive"));
        }
        let vat_amount = if input.apply_vat {
            accounting::vat_amount(input.amount)
        } else {
            Decimal::ZERO
        };
        Ok(Self {
            id: Uuid::new_v4(),
            contract_id,
            due_date: input.due_date,
            amount: input.amount,
            vat_amount,
            status: PaymentStatus::Pending,
            paid_at: None,
            created_at: Utc::now(),
        })
    }

    pub fn total(&self) -> Decimal {
        self.amount + self.vat_amount
    }

    /// Pending or overdue -> Paid
    pub fn collect(mut self) -> Result<Self, DomainError> {
        match self.status {
            PaymentStatus::Pending | PaymentStatus::Overdue => {
                self.status = PaymentStatus::Paid;
                self.paid_at = Some(Utc::now());
                Ok(self)
            }
            other => Err(DomainError::conflict(format!(
                "Cannot collect a payment that is {other}"
            ))),
        }
    }

    /// Stored status, with a pending payment past its due date read as overdue
    pub fn status_on(&self, today: NaiveDate) -> PaymentStatus {
        if self.status == PaymentStatus::Pending && self.due_date < today {
            PaymentStatus::Overdue
        } else {
            self.status
        }
    }

    pub fn is_outstanding(&self) -> bool {
        matches!(self.status, PaymentStatus::Pending | PaymentStatus::Overdue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn contract() -> Contract {
        Contract::new(NewContract {
            contract_number: "C-001".to_string(),
            property_id: Uuid::new_v4(),
            tenant_name: "شركة الأمل".to_string(),
            tenant_phone: "0551234567".to_string(),
            start_date: date(1, 1),
            end_date: date(12, 31),
            annual_rent: Decimal::from(120000),
            payment_frequency: Frequency::Quarterly,
        })
        .unwrap()
    }

    #[test]
    fn test_installment_amount() {
        assert_eq!(contract().installment_amount(), Decimal::from(30000));
    }

    #[test]
    fn test_installment_due_dates() {
        let dates = contract().installment_due_dates();
        assert_eq!(dates, vec![date(1, 1), date(4, 1), date(7, 1), date(10, 1)]);
    }

    #[test]
    fn test_schedule_adds_up_to_rent() {
        let mut c = contract();
        c.annual_rent = Decimal::from(100000);
        c.payment_frequency = Frequency::Monthly;
        c.end_date = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();

        let schedule = c.installment_schedule();
        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule[0].1, Decimal::from_str("8333.33").unwrap());
        assert_eq!(schedule[11].1, Decimal::from_str("8333.37").unwrap());
        let total: Decimal = schedule.iter().map(|(_, amount)| *amount).sum();
        assert_eq!(total, Decimal::from(100000));
    }

    #[test]
    fn test_schedule_for_partial_year() {
        let mut c = contract();
        c.end_date = date(6, 30);
        let schedule = c.installment_schedule();
        assert_eq!(schedule.len(), 2);
        let total: Decimal = schedule.iter().map(|(_, amount)| *amount).sum();
        assert_eq!(total, Decimal::from(60000));
    }

    #[test]
    fn test_contract_expires_after_end_date() {
        let c = contract();
        assert_eq!(c.status_on(date(12, 31)), ContractStatus::Active);
        assert_eq!(
            c.status_on(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()),
            ContractStatus::Expired
        );

        let mut terminated = contract();
        terminated.status = ContractStatus::Terminated;
        assert_eq!(
            terminated.status_on(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()),
            ContractStatus::Terminated
        );
    }

    #[test]
    fn test_pending_payment_becomes_overdue() {
        let payment = RentalPayment::new(
            Uuid::new_v4(),
            NewRentalPayment {
                due_date: date(3, 1),
                amount: Decimal::from(1000),
                apply_vat: false,
            },
        )
        .unwrap();
        assert_eq!(payment.status_on(date(3, 1)), PaymentStatus::Pending);
        assert_eq!(payment.status_on(date(3, 2)), PaymentStatus::Overdue);

        let paid = payment.collect().unwrap();
        assert_eq!(paid.status_on(date(12, 1)), PaymentStatus::Paid);
    }

    #[test]
    fn test_end_must_follow_start() {
        let result = Contract::new(NewContract {
            end_date: date(1, 1),
            ..NewContract {
                contract_number: "C-002".to_string(),
                property_id: Uuid::new_v4(),
                tenant_name: "x".to_string(),
                tenant_phone: "0551234567".to_string(),
                start_date: date(1, 1),
                end_date: date(2, 1),
                annual_rent: Decimal::from(1),
                payment_frequency: Frequency::Annual,
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_expiring_window() {
        let c = contract();
        assert!(c.is_expiring_within(30, date(12, 10)));
        assert!(!c.is_expiring_within(30, date(11, 1)));
        assert!(!c.is_expiring_within(30, NaiveDate::from_ymd_opt(2027, 1, 2).unwrap()));
    }

    #[test]
    fn test_payment_vat_and_collection() {
        let payment = RentalPayment::new(
            Uuid::new_v4(),
            NewRentalPayment {
                due_date: date(3, 1),
                amount: Decimal::from_str("30000").unwrap(),
                apply_vat: true,
            },
        )
        .unwrap();
        assert_eq!(payment.vat_amount, Decimal::from(4500));
        assert_eq!(payment.total(), Decimal::from(34500));

        let paid = payment.collect().unwrap();
        assert_eq!(paid.status, PaymentStatus::Paid);
        assert!(paid.collect().is_err());
    }
}
