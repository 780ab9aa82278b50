//! PostgreSQL implementation of TreasuryRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use waqf::domain::{Fund, Loan};
use waqf::{DomainError, TreasuryRepository};

use super::{convert_all, db_err, parse_text};

pub struct PgTreasuryRepository {
    pool: PgPool,
}

impl PgTreasuryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct FundRow {
    id: Uuid,
    name: String,
    fund_type: String,
    balance: Decimal,
    target_amount: Option<Decimal>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<FundRow> for Fund {
    type Error = DomainError;

    fn try_from(row: FundRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            fund_type: parse_text("fund_type", &row.fund_type)?,
            balance: row.balance,
            target_amount: row.target_amount,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct LoanRow {
    id: Uuid,
    beneficiary_id: Uuid,
    principal: Decimal,
    paid_amount: Decimal,
    status: String,
    start_date: NaiveDate,
    due_date: NaiveDate,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<LoanRow> for Loan {
    type Error = DomainError;

    fn try_from(row: LoanRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            beneficiary_id: row.beneficiary_id,
            principal: row.principal,
            paid_amount: row.paid_amount,
            status: parse_text("status", &row.status)?,
            start_date: row.start_date,
            due_date: row.due_date,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl TreasuryRepository for PgTreasuryRepository {
    async fn find_funds(&self) -> Result<Vec<Fund>, DomainError> {
        let rows = sqlx::query_as::<_, FundRow>("SELECT * FROM funds ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        convert_all(rows)
    }

    async fn save_fund(&self, fund: &Fund) -> Result<Fund, DomainError> {
        let row = sqlx::query_as::<_, FundRow>(
            r#"
            INSERT INTO funds (id, name, fund_type, balance, target_amount, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET name = $2, fund_type = $3, balance = $4, target_amount = $5
            RETURNING *
            "#,
        )
        .bind(fund.id)
        .bind(&fund.name)
        .bind(fund.fund_type.as_str())
        .bind(fund.balance)
        .bind(fund.target_amount)
        .bind(fund.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }

    async fn find_loan(&self, id: Uuid) -> Result<Option<Loan>, DomainError> {
        sqlx::query_as::<_, LoanRow>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(Loan::try_from)
            .transpose()
    }

    async fn find_loans(&self, beneficiary_id: Option<Uuid>) -> Result<Vec<Loan>, DomainError> {
        let rows = sqlx::query_as::<_, LoanRow>(
            r#"
            SELECT * FROM loans
            WHERE ($1::UUID IS NULL OR beneficiary_id = $1)
            ORDER BY due_date
            "#,
        )
        .bind(beneficiary_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        convert_all(rows)
    }

    async fn save_loan(&self, loan: &Loan) -> Result<Loan, DomainError> {
        let row = sqlx::query_as::<_, LoanRow>(
            r#"
            INSERT INTO loans
                (id, beneficiary_id, principal, paid_amount, status, start_date, due_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET paid_amount = $4, status = $5, due_date = $7
            RETURNING *
            "#,
        )
        .bind(loan.id)
        .bind(loan.beneficiary_id)
        .bind(loan.principal)
        .bind(loan.paid_amount)
        .bind(loan.status.as_str())
        .bind(loan.start_date)
        .bind(loan.due_date)
        .bind(loan.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }

    async fn mark_defaulted(&self, today: NaiveDate) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE loans SET status = 'defaulted' WHERE status = 'active' AND due_date < $1",
        )
        .bind(today)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected())
    }
}
