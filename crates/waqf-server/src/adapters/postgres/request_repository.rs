//! PostgreSQL implementation of RequestRepository

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use waqf::{ApprovalStatus, BeneficiaryRequest, DomainError, RequestRepository};

use super::{convert_all, db_err, parse_text};

pub struct PgRequestRepository {
    pool: PgPool,
}

impl PgRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct RequestRow {
    id: Uuid,
    beneficiary_id: Uuid,
    request_type: String,
    description: String,
    amount: Option<Decimal>,
    status: String,
    decision_note: Option<String>,
    decided_by: Option<Uuid>,
    decided_at: Option<chrono::DateTime<chrono::Utc>>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<RequestRow> for BeneficiaryRequest {
    type Error = DomainError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            beneficiary_id: row.beneficiary_id,
            request_type: parse_text("request_type", &row.request_type)?,
            description: row.description,
            amount: row.amount,
            status: parse_text("status", &row.status)?,
            decision_note: row.decision_note,
            decided_by: row.decided_by,
            decided_at: row.decided_at,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl RequestRepository for PgRequestRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BeneficiaryRequest>, DomainError> {
        sqlx::query_as::<_, RequestRow>("SELECT * FROM beneficiary_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(BeneficiaryRequest::try_from)
            .transpose()
    }

    async fn find_all(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<BeneficiaryRequest>, DomainError> {
        let rows = sqlx::query_as::<_, RequestRow>(
            r#"
            SELECT * FROM beneficiary_requests
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        convert_all(rows)
    }

    async fn find_by_beneficiary(
        &self,
        beneficiary_id: Uuid,
    ) -> Result<Vec<BeneficiaryRequest>, DomainError> {
        let rows = sqlx::query_as::<_, RequestRow>(
            "SELECT * FROM beneficiary_requests WHERE beneficiary_id = $1 ORDER BY created_at DESC",
        )
        .bind(beneficiary_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        convert_all(rows)
    }

    async fn save(&self, request: &BeneficiaryRequest) -> Result<BeneficiaryRequest, DomainError> {
        let row = sqlx::query_as::<_, RequestRow>(
            r#"
            INSERT INTO beneficiary_requests
                (id, beneficiary_id, request_type, description, amount, status,
                 decision_note, decided_by, decided_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE
            SET description = $4, amount = $5, status = $6, decision_note = $7,
                decided_by = $8, decided_at = $9
            RETURNING *
            "#,
        )
        .bind(request.id)
        .bind(request.beneficiary_id)
        .bind(request.request_type.as_str())
        .bind(&request.description)
        .bind(request.amount)
        .bind(request.status.as_str())
        .bind(&request.decision_note)
        .bind(request.decided_by)
        .bind(request.decided_at)
        .bind(request.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }
}
