//! PostgreSQL implementation of LedgerRepository
//!
//! Entries and their lines live in separate tables; an entry is always read
//! and written together with its lines.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use waqf::domain::{Account, JournalLine, JournalStatus, PostedLine};
use waqf::{DomainError, JournalEntry, LedgerRepository};

use super::{convert_all, db_err, parse_text};

pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach lines to entry rows, keeping the entries' order
    async fn with_lines(&self, rows: Vec<EntryRow>) -> Result<Vec<JournalEntry>, DomainError> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let lines = sqlx::query_as::<_, LineRow>(
            r#"
            SELECT entry_id, account_id, debit, credit, description
            FROM journal_lines
            WHERE entry_id = ANY($1)
            ORDER BY entry_id, line_no
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut by_entry: HashMap<Uuid, Vec<JournalLine>> = HashMap::new();
        for line in lines {
            by_entry.entry(line.entry_id).or_default().push(line.into());
        }

        rows.into_iter()
            .map(|row| {
                let lines = by_entry.remove(&row.id).unwrap_or_default();
                row.into_entry(lines)
            })
            .collect()
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    code: String,
    name: String,
    account_type: String,
    parent_id: Option<Uuid>,
    is_active: bool,
}

impl TryFrom<AccountRow> for Account {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            code: row.code,
            name: row.name,
            account_type: parse_text("account_type", &row.account_type)?,
            parent_id: row.parent_id,
            is_active: row.is_active,
        })
    }
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: Uuid,
    entry_number: String,
    entry_date: NaiveDate,
    description: String,
    status: String,
    created_by: Option<Uuid>,
    posted_at: Option<chrono::DateTime<chrono::Utc>>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl EntryRow {
    fn into_entry(self, lines: Vec<JournalLine>) -> Result<JournalEntry, DomainError> {
        Ok(JournalEntry {
            id: self.id,
            entry_number: self.entry_number,
            entry_date: self.entry_date,
            description: self.description,
            status: parse_text("status", &self.status)?,
            lines,
            created_by: self.created_by,
            posted_at: self.posted_at,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LineRow {
    entry_id: Uuid,
    account_id: Uuid,
    debit: Decimal,
    credit: Decimal,
    description: Option<String>,
}

impl From<LineRow> for JournalLine {
    fn from(row: LineRow) -> Self {
        Self {
            account_id: row.account_id,
            debit: row.debit,
            credit: row.credit,
            description: row.description,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PostedLineRow {
    entry_id: Uuid,
    entry_number: String,
    entry_date: NaiveDate,
    account_id: Uuid,
    account_code: String,
    account_name: String,
    account_type: String,
    debit: Decimal,
    credit: Decimal,
    description: Option<String>,
}

impl TryFrom<PostedLineRow> for PostedLine {
    type Error = DomainError;

    fn try_from(row: PostedLineRow) -> Result<Self, Self::Error> {
        Ok(Self {
            entry_id: row.entry_id,
            entry_number: row.entry_number,
            entry_date: row.entry_date,
            account_id: row.account_id,
            account_code: row.account_code,
            account_name: row.account_name,
            account_type: parse_text("account_type", &row.account_type)?,
            debit: row.debit,
            credit: row.credit,
            description: row.description,
        })
    }
}

/// Lines of posted entries joined with their accounts
pub(super) const POSTED_LINES_SQL: &str = r#"
    SELECT e.id AS entry_id, e.entry_number, e.entry_date,
           a.id AS account_id, a.code AS account_code, a.name AS account_name, a.account_type,
           l.debit, l.credit, l.description
    FROM journal_lines l
    JOIN journal_entries e ON e.id = l.entry_id
    JOIN accounts a ON a.id = l.account_id
    WHERE e.status = 'posted'
"#;

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    async fn find_accounts(&self) -> Result<Vec<Account>, DomainError> {
        let rows = sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts ORDER BY code")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        convert_all(rows)
    }

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(Account::try_from)
            .transpose()
    }

    async fn save_account(&self, account: &Account) -> Result<Account, DomainError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (id, code, name, account_type, parent_id, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET code = $2, name = $3, account_type = $4, parent_id = $5, is_active = $6
            RETURNING *
            "#,
        )
        .bind(account.id)
        .bind(&account.code)
        .bind(&account.name)
        .bind(account.account_type.as_str())
        .bind(account.parent_id)
        .bind(account.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }

    async fn find_entry(&self, id: Uuid) -> Result<Option<JournalEntry>, DomainError> {
        let row = sqlx::query_as::<_, EntryRow>("SELECT * FROM journal_entries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => Ok(self.with_lines(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_entries(
        &self,
        status: Option<JournalStatus>,
    ) -> Result<Vec<JournalEntry>, DomainError> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT * FROM journal_entries
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY entry_date DESC, entry_number DESC
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        self.with_lines(rows).await
    }

    async fn save_entry(&self, entry: &JournalEntry) -> Result<JournalEntry, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            INSERT INTO journal_entries
                (id, entry_number, entry_date, description, status, created_by, posted_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET entry_date = $3, description = $4, status = $5, posted_at = $7
            RETURNING *
            "#,
        )
        .bind(entry.id)
        .bind(&entry.entry_number)
        .bind(entry.entry_date)
        .bind(&entry.description)
        .bind(entry.status.as_str())
        .bind(entry.created_by)
        .bind(entry.posted_at)
        .bind(entry.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query("DELETE FROM journal_lines WHERE entry_id = $1")
            .bind(entry.id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        for (line_no, line) in entry.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO journal_lines (entry_id, line_no, account_id, debit, credit, description)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(entry.id)
            .bind(line_no as i32)
            .bind(line.account_id)
            .bind(line.debit)
            .bind(line.credit)
            .bind(&line.description)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;

        row.into_entry(entry.lines.clone())
    }

    async fn delete_entry(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn posted_lines(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<PostedLine>, DomainError> {
        let sql = format!(
            "{POSTED_LINES_SQL} AND ($1::DATE IS NULL OR e.entry_date >= $1) \
             AND ($2::DATE IS NULL OR e.entry_date <= $2) ORDER BY e.entry_date, e.entry_number"
        );
        let rows = sqlx::query_as::<_, PostedLineRow>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        convert_all(rows)
    }

    async fn posted_lines_for_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<PostedLine>, DomainError> {
        let sql = format!(
            "{POSTED_LINES_SQL} AND l.account_id = $1 ORDER BY e.entry_date, e.entry_number"
        );
        let rows = sqlx::query_as::<_, PostedLineRow>(&sql)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        convert_all(rows)
    }
}
