//! PostgreSQL implementation of GovernanceRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use waqf::domain::{BoardDecision, DecisionStatus, Vote};
use waqf::{DomainError, GovernanceRepository};

use super::{convert_all, db_err, parse_text};

pub struct PgGovernanceRepository {
    pool: PgPool,
}

impl PgGovernanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DecisionRow {
    id: Uuid,
    title: String,
    description: String,
    status: String,
    outcome: Option<String>,
    quorum: i32,
    voting_deadline: Option<chrono::DateTime<chrono::Utc>>,
    created_by: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
    closed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl TryFrom<DecisionRow> for BoardDecision {
    type Error = DomainError;

    fn try_from(row: DecisionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status: parse_text("status", &row.status)?,
            outcome: row
                .outcome
                .as_deref()
                .map(|o| parse_text("outcome", o))
                .transpose()?,
            quorum: row.quorum,
            voting_deadline: row.voting_deadline,
            created_by: row.created_by,
            created_at: row.created_at,
            closed_at: row.closed_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VoteRow {
    decision_id: Uuid,
    voter_id: Uuid,
    choice: String,
    cast_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<VoteRow> for Vote {
    type Error = DomainError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(Self {
            decision_id: row.decision_id,
            voter_id: row.voter_id,
            choice: parse_text("choice", &row.choice)?,
            cast_at: row.cast_at,
        })
    }
}

#[async_trait]
impl GovernanceRepository for PgGovernanceRepository {
    async fn find_decision(&self, id: Uuid) -> Result<Option<BoardDecision>, DomainError> {
        sqlx::query_as::<_, DecisionRow>("SELECT * FROM board_decisions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(BoardDecision::try_from)
            .transpose()
    }

    async fn find_decisions(
        &self,
        status: Option<DecisionStatus>,
    ) -> Result<Vec<BoardDecision>, DomainError> {
        let rows = sqlx::query_as::<_, DecisionRow>(
            r#"
            SELECT * FROM board_decisions
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

    async fn save_decision(&self, decision: &BoardDecision) -> Result<BoardDecision, DomainError> {
        let row = sqlx::query_as::<_, DecisionRow>(
            r#"
            INSERT INTO board_decisions
                (id, title, description, status, outcome, quorum, voting_deadline,
                 created_by, created_at, closed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE
            SET title = $2, description = $3, status = $4, outcome = $5, quorum = $6,
                voting_deadline = $7, closed_at = $10
            RETURNING *
            "#,
        )
        .bind(decision.id)
        .bind(&decision.title)
        .bind(&decision.description)
        .bind(decision.status.as_str())
        .bind(decision.outcome.map(|o| o.as_str()))
        .bind(decision.quorum)
        .bind(decision.voting_deadline)
        .bind(decision.created_by)
        .bind(decision.created_at)
        .bind(decision.closed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }

    async fn find_votes(&self, decision_id: Uuid) -> Result<Vec<Vote>, DomainError> {
        let rows = sqlx::query_as::<_, VoteRow>(
            "SELECT * FROM board_votes WHERE decision_id = $1 ORDER BY cast_at",
        )
        .bind(decision_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        convert_all(rows)
    }

    async fn save_vote(&self, vote: &Vote) -> Result<Vote, DomainError> {
        let row = sqlx::query_as::<_, VoteRow>(
            r#"
            INSERT INTO board_votes (decision_id, voter_id, choice, cast_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (decision_id, voter_id) DO UPDATE
            SET choice = $3, cast_at = $4
            RETURNING *
            "#,
        )
        .bind(vote.decision_id)
        .bind(vote.voter_id)
        .bind(vote.choice.as_str())
        .bind(vote.cast_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }
}
