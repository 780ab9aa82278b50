//! Treasury - Funds and interest-free loans to beneficiaries

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::errors::DomainError;

text_enum! {
    pub enum FundType {
        Reserve => "reserve",
        Investment => "investment",
        Charity => "charity",
        Maintenance => "maintenance",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Fund {
    pub id: Uuid,
    pub name: String,
    pub fund_type: FundType,
    pub balance: Decimal,
    pub target_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewFund {
    pub name: String,
    pub fund_type: FundType,
    #[serde(default)]
    pub balance: Decimal,
    pub target_amount: Option<Decimal>,
}

impl Fund {
    pub fn new(input: NewFund) -> Result<Self, DomainError> {
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            fund_type: input.fund_type,
            balance: input.balance,
            target_amount: input.target_amount,
            created_at: Utc::now(),
        })
    }
}

text_enum! {
    pub enum LoanStatus {
        Active => "active",
        Paid => "paid",
        Defaulted => "defaulted",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Loan {
    pub id: Uuid,
    pub beneficiary_id: Uuid,
    pub principal: Decimal,
    pub paid_amount: Decimal,
    pub status: LoanStatus,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewLoan {
    pub beneficiary_id: Uuid,
    pub principal: Decimal,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl Loan {
    pub fn new(input: NewLoan) -> Result<Self, DomainError> {
        if input.principal <= Decimal::ZERO {
            return Err(DomainError::validation("principal must be positive"));
        }
        if input.due_date <= input.start_date {
            return Err(DomainError::validation("due_date must be after start_date"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            beneficiary_id: input.beneficiary_id,
            principal: input.principal,
            paid_amount: Decimal::ZERO,
            status: LoanStatus::Active,
            start_date: input.start_date,
            due_date: input.due_date,
            created_at: Utc::now(),
        })
    }

    pub fn outstanding(&self) -> Decimal {
        self.principal - self.paid_amount
    }

    /// Stored status, with an active loan past its due date read as defaulted
    pub fn status_on(&self, today: NaiveDate) -> LoanStatus {
        if self.status == LoanStatus::Active && self.due_date < today {
            LoanStatus::Defaulted
        } else {
            self.status
        }
    }

    /// Record a repayment; settling the principal closes the loan.
    /// Defaulted loans still accept repayments.
    pub fn repay(mut self, amount: Decimal) -> Result<Self, DomainError> {
        if self.status == LoanStatus::Paid {
            return Err(DomainError::conflict(format!(
                "Cannot repay a loan that is {}",
                self.status
            )));
        }
        if amount <= Decimal::ZERO {
            return Err(DomainError::validation("amount must be positive"));
        }
        if amount > self.outstanding() {
            return Err(DomainError::Validation(format!(
                "amount exceeds outstanding balance of {}",
                self.outstanding()
            )));
        }
        self.paid_amount += amount;
        if self.outstanding().is_zero() {
            self.status = LoanStatus::Paid;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan() -> Loan {
        Loan::new(NewLoan {
            beneficiary_id: Uuid::new_v4(),
            principal: Decimal::from(10000),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn test_repay_until_settled() {
        let loan = loan().repay(Decimal::from(4000)).unwrap();
        assert_eq!(loan.outstanding(), Decimal::from(6000));
        assert_eq!(loan.status, LoanStatus::Active);

        let loan = loan.repay(Decimal::from(6000)).unwrap();
        assert_eq!(loan.status, LoanStatus::Paid);
        assert!(loan.repay(Decimal::from(1)).is_err());
    }

    #[test]
    fn test_loan_defaults_after_due_date() {
        let due = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        let loan = loan();
        assert_eq!(loan.status_on(due), LoanStatus::Active);
        assert_eq!(loan.status_on(due.succ_opt().unwrap()), LoanStatus::Defaulted);

        let mut defaulted = loan;
        defaulted.status = LoanStatus::Defaulted;
        let settled = defaulted.repay(Decimal::from(10000)).unwrap();
        assert_eq!(settled.status, LoanStatus::Paid);
        assert_eq!(settled.status_on(due.succ_opt().unwrap()), LoanStatus::Paid);
    }

    #[test]
    fn test_over_repayment_rejected() {
        assert!(matches!(
            loan().repay(Decimal::from(10001)),
            Err(DomainError::Validation(_))
        ));
    }
}
