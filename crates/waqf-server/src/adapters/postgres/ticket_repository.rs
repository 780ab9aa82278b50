//! PostgreSQL implementation of TicketRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use waqf::domain::SupportTicket;
use waqf::{DomainError, TicketRepository};

use super::{convert_all, db_err, parse_text};

pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    subject: String,
    description: String,
    priority: String,
    status: String,
    created_by: Uuid,
    assigned_to: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<TicketRow> for SupportTicket {
    type Error = DomainError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            subject: row.subject,
            description: row.description,
            priority: parse_text("priority", &row.priority)?,
            status: parse_text("status", &row.status)?,
            created_by: row.created_by,
            assigned_to: row.assigned_to,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SupportTicket>, DomainError> {
        sqlx::query_as::<_, TicketRow>("SELECT * FROM support_tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(SupportTicket::try_from)
            .transpose()
    }

    async fn find_all(&self, created_by: Option<Uuid>) -> Result<Vec<SupportTicket>, DomainError> {
        let rows = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT * FROM support_tickets
            WHERE ($1::UUID IS NULL OR created_by = $1)
            ORDER BY updated_at DESC
            "#,
        )
        .bind(created_by)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        convert_all(rows)
    }

    async fn save(&self, ticket: &SupportTicket) -> Result<SupportTicket, DomainError> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            INSERT INTO support_tickets
                (id, subject, description, priority, status, created_by, assigned_to,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE
            SET subject = $2, description = $3, priority = $4, status = $5,
                assigned_to = $7, updated_at = $9
            RETURNING *
            "#,
        )
        .bind(ticket.id)
        .bind(&ticket.subject)
        .bind(&ticket.description)
        .bind(ticket.priority.as_str())
        .bind(ticket.status.as_str())
        .bind(ticket.created_by)
        .bind(ticket.assigned_to)
        .bind(ticket.created_at)
        .bind(ticket.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }
}
