//! Journal - Double-entry bookkeeping records

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::services::accounting;
use crate::domain::value_objects::AccountType;

/// Chart of accounts entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub parent_id: Option<Uuid>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewAccount {
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub parent_id: Option<Uuid>,
}

impl Account {
    pub fn new(input: NewAccount) -> Result<Self, DomainError> {
        let code = input.code.trim().to_string();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation("account code must be digits"));
        }
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("account name is required"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            code,
            name: input.name.trim().to_string(),
            account_type: input.account_type,
            parent_id: input.parent_id,
            is_active: true,
        })
    }
}

text_enum! {
    pub enum JournalStatus {
        Draft => "draft",
        Posted => "posted",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JournalLine {
    pub account_id: Uuid,
    pub debit: Decimal,
    pub credit: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JournalEntry {
    pub id: Uuid,
    pub entry_number: String,
    pub entry_date: NaiveDate,
    pub description: String,
    pub status: JournalStatus,
    pub lines: Vec<JournalLine>,
    pub created_by: Option<Uuid>,
    pub posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewJournalEntry {
    pub entry_date: NaiveDate,
    pub description: String,
    pub lines: Vec<JournalLine>,
}

/// A line of a posted entry joined with its account, as read for reports
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostedLine {
    pub entry_id: Uuid,
    pub entry_number: String,
    pub entry_date: NaiveDate,
    pub account_id: Uuid,
    pub account_code: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub debit: Decimal,
    pub credit: Decimal,
    pub description: Option<String>,
}

impl JournalEntry {
    /// Build a draft entry; line shape is checked, balance is checked at posting
    pub fn draft(input: NewJournalEntry, created_by: Option<Uuid>) -> Result<Self, DomainError> {
        if input.description.trim().is_empty() {
            return Err(DomainError::validation("description is required"));
        }
        for line in &input.lines {
            accounting::validate_line(line)?;
        }

        let id = Uuid::new_v4();
        let suffix = id.simple().to_string()[..6].to_uppercase();
        Ok(Self {
            id,
            entry_number: format!("JE-{}-{}", input.entry_date.format("%Y%m%d"), suffix),
            entry_date: input.entry_date,
            description: input.description.trim().to_string(),
            status: JournalStatus::Draft,
            lines: input.lines,
            created_by,
            posted_at: None,
            created_at: Utc::now(),
        })
    }

    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }

    /// Draft -> Posted, only when the entry balances
    pub fn post(mut self) -> Result<Self, DomainError> {
        if self.status != JournalStatus::Draft {
            return Err(DomainError::conflict(format!(
                "Only draft entries can be posted (entry is {})",
                self.status
            )));
        }
        accounting::validate_balanced(&self.lines)?;
        self.status = JournalStatus::Posted;
        self.posted_at = Some(Utc::now());
        Ok(self)
    }

    /// Posted -> Cancelled
    pub fn cancel(mut self) -> Result<Self, DomainError> {
        if self.status != JournalStatus::Posted {
            return Err(DomainError::conflict(format!(
                "Only posted entries can be cancelled (entry is {})",
                self.status
            )));
        }
        self.status = JournalStatus::Cancelled;
        Ok(self)
    }

    pub fn can_delete(&self) -> bool {
        self.status == JournalStatus::Draft
    }
}
