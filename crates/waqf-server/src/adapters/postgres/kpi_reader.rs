//! PostgreSQL implementation of KpiReader
//!
//! One plain query per slice, reusing the repositories' row mappings.

use async_trait::async_trait;
use sqlx::PgPool;

use waqf::domain::{Fund, Loan, PostedLine};
use waqf::{
    Beneficiary, BeneficiaryRequest, Contract, Distribution, DomainError, KpiReader, Property,
    RentalPayment,
};

use super::beneficiary_repository::BeneficiaryRow;
use super::contract_repository::{ContractRow, PaymentRow};
use super::distribution_repository::DistributionRow;
use super::ledger_repository::{PostedLineRow, POSTED_LINES_SQL};
use super::property_repository::PropertyRow;
use super::request_repository::RequestRow;
use super::treasury_repository::{FundRow, LoanRow};
use super::{convert_all, db_err};

pub struct PgKpiReader {
    pool: PgPool,
}

impl PgKpiReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn read<R, T>(&self, sql: &str) -> Result<Vec<T>, DomainError>
    where
        R: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
        T: TryFrom<R, Error = DomainError> + Send,
    {
        let rows = sqlx::query_as::<_, R>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        convert_all(rows)
    }
}

#[async_trait]
impl KpiReader for PgKpiReader {
    async fn beneficiaries(&self) -> Result<Vec<Beneficiary>, DomainError> {
        self.read::<BeneficiaryRow, _>("SELECT * FROM beneficiaries").await
    }

    async fn properties(&self) -> Result<Vec<Property>, DomainError> {
        self.read::<PropertyRow, _>("SELECT * FROM properties").await
    }

    async fn contracts(&self) -> Result<Vec<Contract>, DomainError> {
        self.read::<ContractRow, _>("SELECT * FROM contracts").await
    }

    async fn payments(&self) -> Result<Vec<RentalPayment>, DomainError> {
        self.read::<PaymentRow, _>("SELECT * FROM rental_payments").await
    }

    async fn posted_lines(&self) -> Result<Vec<PostedLine>, DomainError> {
        self.read::<PostedLineRow, _>(POSTED_LINES_SQL).await
    }

    async fn funds(&self) -> Result<Vec<Fund>, DomainError> {
        self.read::<FundRow, _>("SELECT * FROM funds").await
    }

    async fn loans(&self) -> Result<Vec<Loan>, DomainError> {
        self.read::<LoanRow, _>("SELECT * FROM loans").await
    }

    async fn requests(&self) -> Result<Vec<BeneficiaryRequest>, DomainError> {
        self.read::<RequestRow, _>("SELECT * FROM beneficiary_requests").await
    }

    async fn distributions(&self) -> Result<Vec<Distribution>, DomainError> {
        self.read::<DistributionRow, _>("SELECT * FROM distributions").await
    }
}
