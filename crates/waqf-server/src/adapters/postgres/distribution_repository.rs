//! PostgreSQL implementation of DistributionRepository
//!
//! Allocation is delegated to the `distribute_revenue` database function,
//! which inserts the distribution and its shares in one statement.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use waqf::domain::{DistributionShare, NewDistribution};
use waqf::{Distribution, DistributionRepository, DistributionSettings, DomainError};

use super::{convert_all, db_err, parse_text};

pub struct PgDistributionRepository {
    pool: PgPool,
}

impl PgDistributionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SettingsRow {
    frequency: String,
    nazer_percentage: Decimal,
    reserve_percentage: Decimal,
    maintenance_percentage: Decimal,
    beneficiaries_percentage: Decimal,
    updated_at: chrono::DateTime<chrono::Utc>,
    updated_by: Option<Uuid>,
}

impl TryFrom<SettingsRow> for DistributionSettings {
    type Error = DomainError;

    fn try_from(row: SettingsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            frequency: parse_text("frequency", &row.frequency)?,
            nazer_percentage: row.nazer_percentage,
            reserve_percentage: row.reserve_percentage,
            maintenance_percentage: row.maintenance_percentage,
            beneficiaries_percentage: row.beneficiaries_percentage,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct DistributionRow {
    id: Uuid,
    period_label: String,
    distribution_date: NaiveDate,
    total_amount: Decimal,
    beneficiaries_count: i32,
    status: String,
    created_by: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<DistributionRow> for Distribution {
    type Error = DomainError;

    fn try_from(row: DistributionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            period_label: row.period_label,
            distribution_date: row.distribution_date,
            total_amount: row.total_amount,
            beneficiaries_count: row.beneficiaries_count,
            status: parse_text("status", &row.status)?,
            created_by: row.created_by,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ShareRow {
    id: Uuid,
    distribution_id: Uuid,
    beneficiary_id: Uuid,
    amount: Decimal,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ShareRow> for DistributionShare {
    fn from(row: ShareRow) -> Self {
        Self {
            id: row.id,
            distribution_id: row.distribution_id,
            beneficiary_id: row.beneficiary_id,
            amount: row.amount,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl DistributionRepository for PgDistributionRepository {
    async fn find_settings(&self) -> Result<Option<DistributionSettings>, DomainError> {
        sqlx::query_as::<_, SettingsRow>("SELECT * FROM distribution_settings WHERE id")
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(DistributionSettings::try_from)
            .transpose()
    }

    async fn save_settings(
        &self,
        settings: &DistributionSettings,
    ) -> Result<DistributionSettings, DomainError> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            INSERT INTO distribution_settings
                (id, frequency, nazer_percentage, reserve_percentage, maintenance_percentage,
                 beneficiaries_percentage, updated_at, updated_by)
            VALUES (TRUE, $1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET frequency = $1, nazer_percentage = $2, reserve_percentage = $3,
                maintenance_percentage = $4, beneficiaries_percentage = $5,
                updated_at = $6, updated_by = $7
            RETURNING *
            "#,
        )
        .bind(settings.frequency.as_str())
        .bind(settings.nazer_percentage)
        .bind(settings.reserve_percentage)
        .bind(settings.maintenance_percentage)
        .bind(settings.beneficiaries_percentage)
        .bind(settings.updated_at)
        .bind(settings.updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Distribution>, DomainError> {
        sqlx::query_as::<_, DistributionRow>("SELECT * FROM distributions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(Distribution::try_from)
            .transpose()
    }

    async fn find_all(&self) -> Result<Vec<Distribution>, DomainError> {
        let rows = sqlx::query_as::<_, DistributionRow>(
            "SELECT * FROM distributions ORDER BY distribution_date DESC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        convert_all(rows)
    }

    async fn save(&self, distribution: &Distribution) -> Result<Distribution, DomainError> {
        let row = sqlx::query_as::<_, DistributionRow>(
            "UPDATE distributions SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(distribution.id)
        .bind(distribution.status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::not_found("Distribution", distribution.id))?;

        row.try_into()
    }

    async fn allocate(
        &self,
        input: &NewDistribution,
        created_by: Option<Uuid>,
    ) -> Result<Distribution, DomainError> {
        let id: Uuid = sqlx::query_scalar("SELECT distribute_revenue($1, $2, $3, $4)")
            .bind(input.total_amount)
            .bind(input.distribution_date)
            .bind(input.period_label.trim())
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Distribution", id))
    }

    async fn find_shares(
        &self,
        distribution_id: Uuid,
    ) -> Result<Vec<DistributionShare>, DomainError> {
        let rows = sqlx::query_as::<_, ShareRow>(
            "SELECT * FROM distribution_shares WHERE distribution_id = $1 ORDER BY created_at",
        )
        .bind(distribution_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_shares_by_beneficiary(
        &self,
        beneficiary_id: Uuid,
    ) -> Result<Vec<DistributionShare>, DomainError> {
        let rows = sqlx::query_as::<_, ShareRow>(
            "SELECT * FROM distribution_shares WHERE beneficiary_id = $1 ORDER BY created_at DESC",
        )
        .bind(beneficiary_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    const SCHEMA: &str = include_str!("../../../migrations/20260101000001_initial_schema.sql");
    const ALLOCATION: &str =
        include_str!("../../../migrations/20260101000003_distribute_revenue.sql");

    #[test]
    fn test_equal_shares_round_down() {
        // 1000.00 across 600 gives 1.66 each and 5.66 left for the last share
        assert!(ALLOCATION.contains("v_each := TRUNC(v_pool / v_count, 2);"));
        assert!(!ALLOCATION.contains("ROUND(v_pool / v_count"));
        assert!(ALLOCATION.contains("v_pool - v_allocated"));
    }

    #[test]
    fn test_share_amounts_cannot_be_negative() {
        let table = SCHEMA
            .split("CREATE TABLE distribution_shares")
            .nth(1)
            .and_then(|rest| rest.split(");").next())
            .unwrap();
        assert!(table.contains("amount NUMERIC(14, 2) NOT NULL CHECK (amount >= 0)"));
    }
}
