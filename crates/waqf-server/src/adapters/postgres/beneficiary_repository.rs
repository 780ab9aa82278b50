//! PostgreSQL implementation of BeneficiaryRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use waqf::domain::BeneficiaryStatus;
use waqf::{Beneficiary, BeneficiaryRepository, DomainError};

use super::{convert_all, db_err, parse_text};

pub struct PgBeneficiaryRepository {
    pool: PgPool,
}

impl PgBeneficiaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
pub(super) struct BeneficiaryRow {
    id: Uuid,
    full_name: String,
    national_id: String,
    phone: String,
    email: Option<String>,
    iban: Option<String>,
    category: String,
    status: String,
    user_id: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<BeneficiaryRow> for Beneficiary {
    type Error = DomainError;

    fn try_from(row: BeneficiaryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            full_name: row.full_name,
            national_id: row.national_id,
            phone: row.phone,
            email: row.email,
            iban: row.iban,
            category: parse_text("category", &row.category)?,
            status: parse_text("status", &row.status)?,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl BeneficiaryRepository for PgBeneficiaryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Beneficiary>, DomainError> {
        sqlx::query_as::<_, BeneficiaryRow>("SELECT * FROM beneficiaries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(Beneficiary::try_from)
            .transpose()
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Beneficiary>, DomainError> {
        sqlx::query_as::<_, BeneficiaryRow>("SELECT * FROM beneficiaries WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(Beneficiary::try_from)
            .transpose()
    }

    async fn find_all(
        &self,
        status: Option<BeneficiaryStatus>,
    ) -> Result<Vec<Beneficiary>, DomainError> {
        let rows = sqlx::query_as::<_, BeneficiaryRow>(
            r#"
            SELECT * FROM beneficiaries
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY full_name
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        convert_all(rows)
    }

    async fn save(&self, beneficiary: &Beneficiary) -> Result<Beneficiary, DomainError> {
        let row = sqlx::query_as::<_, BeneficiaryRow>(
            r#"
            INSERT INTO beneficiaries
                (id, full_name, national_id, phone, email, iban, category, status, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE
            SET full_name = $2, phone = $4, email = $5, iban = $6, category = $7,
                status = $8, user_id = $9, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(beneficiary.id)
        .bind(&beneficiary.full_name)
        .bind(&beneficiary.national_id)
        .bind(&beneficiary.phone)
        .bind(&beneficiary.email)
        .bind(&beneficiary.iban)
        .bind(beneficiary.category.as_str())
        .bind(beneficiary.status.as_str())
        .bind(beneficiary.user_id)
        .bind(beneficiary.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM beneficiaries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}
