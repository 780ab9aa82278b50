//! Ledger Repository Port
//!
//! Chart of accounts, journal entries and posted lines for reports.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Account, JournalEntry, JournalStatus, PostedLine};

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn find_accounts(&self) -> Result<Vec<Account>, DomainError>;

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>, DomainError>;

    async fn save_account(&self, account: &Account) -> Result<Account, DomainError>;

    /// Find an entry with its lines
    async fn find_entry(&self, id: Uuid) -> Result<Option<JournalEntry>, DomainError>;

    /// Entries (with lines), newest first, optionally filtered by status
    async fn find_entries(
        &self,
        status: Option<JournalStatus>,
    ) -> Result<Vec<JournalEntry>, DomainError>;

    /// Save an entry and replace its lines atomically
    async fn save_entry(&self, entry: &JournalEntry) -> Result<JournalEntry, DomainError>;

    async fn delete_entry(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Lines of posted entries dated within the optional range
    async fn posted_lines(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<PostedLine>, DomainError>;

    /// Lines of posted entries touching one account
    async fn posted_lines_for_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<PostedLine>, DomainError>;
}
