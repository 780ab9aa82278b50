//! Ledger Application Service
//!
//! Chart of accounts, journal entries and the reports computed from
//! posted lines.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use waqf::domain::services::accounting::{
    self, BalanceSheet, IncomeStatement, LedgerRow, TrialBalance,
};
use waqf::domain::{Account, JournalStatus, NewAccount, NewJournalEntry};
use waqf::{DomainError, JournalEntry, LedgerRepository};

use super::AuditTrail;

pub struct LedgerService<L: LedgerRepository> {
    repo: Arc<L>,
    audit: AuditTrail,
}

impl<L: LedgerRepository> LedgerService<L> {
    pub fn new(repo: Arc<L>, audit: AuditTrail) -> Self {
        Self { repo, audit }
    }

    pub async fn accounts(&self) -> Result<Vec<Account>, DomainError> {
        let mut accounts = self.repo.find_accounts().await?;
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    pub async fn create_account(&self, input: NewAccount) -> Result<Account, DomainError> {
        if let Some(parent_id) = input.parent_id {
            self.account(parent_id).await?;
        }
        let saved = self.repo.save_account(&Account::new(input)?).await?;
        tracing::info!("Created account {} {}", saved.code, saved.name);
        Ok(saved)
    }

    async fn account(&self, id: Uuid) -> Result<Account, DomainError> {
        self.repo
            .find_account(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Account", id))
    }

    pub async fn entries(&self, status: Option<JournalStatus>) -> Result<Vec<JournalEntry>, DomainError> {
        self.repo.find_entries(status).await
    }

    pub async fn entry(&self, id: Uuid) -> Result<JournalEntry, DomainError> {
        self.repo
            .find_entry(id)
            .await?
            .ok_or_else(|| DomainError::not_found("JournalEntry", id))
    }

    /// Save a draft; every line must reference an active account
    pub async fn create_entry(
        &self,
        input: NewJournalEntry,
        actor: Option<Uuid>,
    ) -> Result<JournalEntry, DomainError> {
        let known: HashSet<Uuid> = self
            .repo
            .find_accounts()
            .await?
            .into_iter()
            .filter(|a| a.is_active)
            .map(|a| a.id)
            .collect();
        if let Some(line) = input.lines.iter().find(|l| !known.contains(&l.account_id)) {
            return Err(DomainError::Validation(format!(
                "unknown or inactive account {}",
                line.account_id
            )));
        }

        let saved = self.repo.save_entry(&JournalEntry::draft(input, actor)?).await?;
        tracing::info!("Created journal entry {}", saved.entry_number);
        Ok(saved)
    }

    pub async fn post_entry(&self, id: Uuid, actor: Option<Uuid>) -> Result<JournalEntry, DomainError> {
        let posted = self.entry(id).await?.post()?;
        let saved = self.repo.save_entry(&posted).await?;

        tracing::info!("Posted journal entry {} ({})", saved.entry_number, saved.total_debit());
        self.audit
            .record(
                actor,
                "post",
                "journal_entry",
                Some(id),
                json!({ "entry_number": saved.entry_number, "amount": saved.total_debit() }),
            )
            .await;
        Ok(saved)
    }

    pub async fn cancel_entry(&self, id: Uuid, actor: Option<Uuid>) -> Result<JournalEntry, DomainError> {
        let cancelled = self.entry(id).await?.cancel()?;
        let saved = self.repo.save_entry(&cancelled).await?;

        tracing::info!("Cancelled journal entry {}", saved.entry_number);
        self.audit
            .record(actor, "cancel", "journal_entry", Some(id), json!({ "entry_number": saved.entry_number }))
            .await;
        Ok(saved)
    }

    pub async fn delete_entry(&self, id: Uuid, actor: Option<Uuid>) -> Result<(), DomainError> {
        let entry = self.entry(id).await?;
        if !entry.can_delete() {
            return Err(DomainError::conflict(format!(
                "Only draft entries can be deleted (entry is {})",
                entry.status
            )));
        }
        self.repo.delete_entry(id).await?;
        self.audit
            .record(actor, "delete", "journal_entry", Some(id), json!({ "entry_number": entry.entry_number }))
            .await;
        Ok(())
    }

    // ---- Reports ----

    pub async fn trial_balance(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<TrialBalance, DomainError> {
        let lines = self.repo.posted_lines(from, to).await?;
        let tb = accounting::trial_balance(&lines);
        if !tb.is_balanced {
            tracing::warn!(
                "Trial balance out of balance: debit {} credit {}",
                tb.total_debit,
                tb.total_credit
            );
        }
        Ok(tb)
    }

    pub async fn account_ledger(&self, account_id: Uuid) -> Result<Vec<LedgerRow>, DomainError> {
        let account = self.account(account_id).await?;
        let lines = self.repo.posted_lines_for_account(account_id).await?;
        Ok(accounting::account_ledger(account.account_type, &lines))
    }

    pub async fn income_statement(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<IncomeStatement, DomainError> {
        let lines = self.repo.posted_lines(from, to).await?;
        Ok(accounting::income_statement(&lines))
    }

    /// Position as of `to`
    pub async fn balance_sheet(&self, to: Option<NaiveDate>) -> Result<BalanceSheet, DomainError> {
        let lines = self.repo.posted_lines(None, to).await?;
        Ok(accounting::balance_sheet(&lines))
    }
}
