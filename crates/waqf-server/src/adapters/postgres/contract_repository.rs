//! PostgreSQL implementation of ContractRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use waqf::{Contract, ContractRepository, DomainError, RentalPayment};

use super::{convert_all, db_err, parse_text};

pub struct PgContractRepository {
    pool: PgPool,
}

impl PgContractRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct ContractRow {
    id: Uuid,
    contract_number: String,
    property_id: Uuid,
    tenant_name: String,
    tenant_phone: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    annual_rent: Decimal,
    payment_frequency: String,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<ContractRow> for Contract {
    type Error = DomainError;

    fn try_from(row: ContractRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            contract_number: row.contract_number,
            property_id: row.property_id,
            tenant_name: row.tenant_name,
            tenant_phone: row.tenant_phone,
            start_date: row.start_date,
            end_date: row.end_date,
            annual_rent: row.annual_rent,
            payment_frequency: parse_text("payment_frequency", &row.payment_frequency)?,
            status: parse_text("status", &row.status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PaymentRow {
    id: Uuid,
    contract_id: Uuid,
    due_date: NaiveDate,
    amount: Decimal,
    vat_amount: Decimal,
    status: String,
    paid_at: Option<chrono::DateTime<chrono::Utc>>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<PaymentRow> for RentalPayment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            contract_id: row.contract_id,
            due_date: row.due_date,
            amount: row.amount,
            vat_amount: row.vat_amount,
            status: parse_text("status", &row.status)?,
            paid_at: row.paid_at,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ContractRepository for PgContractRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contract>, DomainError> {
        sqlx::query_as::<_, ContractRow>("SELECT * FROM contracts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(Contract::try_from)
            .transpose()
    }

    async fn find_all(&self, property_id: Option<Uuid>) -> Result<Vec<Contract>, DomainError> {
        let rows = sqlx::query_as::<_, ContractRow>(
            r#"
            SELECT * FROM contracts
            WHERE ($1::UUID IS NULL OR property_id = $1)
            ORDER BY end_date
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        convert_all(rows)
    }

    async fn save(&self, contract: &Contract) -> Result<Contract, DomainError> {
        let row = sqlx::query_as::<_, ContractRow>(
            r#"
            INSERT INTO contracts
                (id, contract_number, property_id, tenant_name, tenant_phone, start_date,
                 end_date, annual_rent, payment_frequency, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE
            SET tenant_name = $4, tenant_phone = $5, start_date = $6, end_date = $7,
                annual_rent = $8, payment_frequency = $9, status = $10
            RETURNING *
            "#,
        )
        .bind(contract.id)
        .bind(&contract.contract_number)
        .bind(contract.property_id)
        .bind(&contract.tenant_name)
        .bind(&contract.tenant_phone)
        .bind(contract.start_date)
        .bind(contract.end_date)
        .bind(contract.annual_rent)
        .bind(contract.payment_frequency.as_str())
        .bind(contract.status.as_str())
        .bind(contract.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn expire_ended(&self, today: NaiveDate) -> Result<Vec<Contract>, DomainError> {
        let rows = sqlx::query_as::<_, ContractRow>(
            r#"
            UPDATE contracts SET status = 'expired'
            WHERE status = 'active' AND end_date < $1
            RETURNING *
            "#,
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        convert_all(rows)
    }

    async fn find_payment(&self, id: Uuid) -> Result<Option<RentalPayment>, DomainError> {
        sqlx::query_as::<_, PaymentRow>("SELECT * FROM rental_payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(RentalPayment::try_from)
            .transpose()
    }

    async fn find_payments(
        &self,
        contract_id: Option<Uuid>,
    ) -> Result<Vec<RentalPayment>, DomainError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT * FROM rental_payments
            WHERE ($1::UUID IS NULL OR contract_id = $1)
            ORDER BY due_date
            "#,
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        convert_all(rows)
    }

    async fn find_payments_due(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RentalPayment>, DomainError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT * FROM rental_payments
            WHERE status IN ('pending', 'overdue') AND due_date BETWEEN $1 AND $2
            ORDER BY due_date
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        convert_all(rows)
    }

    async fn mark_overdue(&self, today: NaiveDate) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE rental_payments SET status = 'overdue' WHERE status = 'pending' AND due_date < $1",
        )
        .bind(today)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected())
    }

    async fn save_payment(&self, payment: &RentalPayment) -> Result<RentalPayment, DomainError> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            INSERT INTO rental_payments
                (id, contract_id, due_date, amount, vat_amount, status, paid_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET due_date = $3, amount = $4, vat_amount = $5, status = $6, paid_at = $7
            RETURNING *
            "#,
        )
        .bind(payment.id)
        .bind(payment.contract_id)
        .bind(payment.due_date)
        .bind(payment.amount)
        .bind(payment.vat_amount)
        .bind(payment.status.as_str())
        .bind(payment.paid_at)
        .bind(payment.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }
}
