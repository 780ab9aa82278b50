//! PostgreSQL implementation of PropertyRepository

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use waqf::{DomainError, Property, PropertyRepository};

use super::{convert_all, db_err, parse_text};

pub struct PgPropertyRepository {
    pool: PgPool,
}

impl PgPropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PropertyRow {
    id: Uuid,
    name: String,
    location: String,
    property_type: String,
    status: String,
    units: i32,
    annual_rent: Decimal,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<PropertyRow> for Property {
    type Error = DomainError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            location: row.location,
            property_type: parse_text("property_type", &row.property_type)?,
            status: parse_text("status", &row.status)?,
            units: row.units,
            annual_rent: row.annual_rent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl PropertyRepository for PgPropertyRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Property>, DomainError> {
        sqlx::query_as::<_, PropertyRow>("SELECT * FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(Property::try_from)
            .transpose()
    }

    async fn find_all(&self) -> Result<Vec<Property>, DomainError> {
        let rows = sqlx::query_as::<_, PropertyRow>("SELECT * FROM properties ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        convert_all(rows)
    }

    async fn save(&self, property: &Property) -> Result<Property, DomainError> {
        let row = sqlx::query_as::<_, PropertyRow>(
            r#"
            INSERT INTO properties
                (id, name, location, property_type, status, units, annual_rent, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET name = $2, location = $3, property_type = $4, status = $5, units = $6,
                annual_rent = $7, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(property.id)
        .bind(&property.name)
        .bind(&property.location)
        .bind(property.property_type.as_str())
        .bind(property.status.as_str())
        .bind(property.units)
        .bind(property.annual_rent)
        .bind(property.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}
