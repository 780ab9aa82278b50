//! In-memory port implementations for service tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use waqf::domain::{
    Account, AuditEntry, BeneficiaryCategory, BeneficiaryStatus, BoardDecision, ContractStatus,
    DecisionStatus, DistributionShare, Fund, JournalEntry, JournalStatus, Loan, LoanStatus,
    NewBeneficiary, NewDistribution, PaymentStatus, PostedLine, Property, SupportTicket, Vote,
};
use waqf::*;

#[derive(Default)]
pub struct RecordingFunctions {
    calls: Mutex<Vec<String>>,
    bodies: Mutex<Vec<serde_json::Value>>,
    fail: bool,
}

impl RecordingFunctions {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn bodies(&self) -> Vec<serde_json::Value> {
        self.bodies.lock().unwrap().clone()
    }
}

#[async_trait]
impl EdgeFunctions for RecordingFunctions {
    async fn invoke(
        &self,
        name: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        self.calls.lock().unwrap().push(name.to_string());
        self.bodies.lock().unwrap().push(body);
        if self.fail {
            return Err(DomainError::ExternalService("function unavailable".to_string()));
        }
        Ok(serde_json::json!({ "ok": true }))
    }
}

#[derive(Default)]
pub struct MemoryAudit {
    pub entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAudit {
    pub fn actions(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|e| format!("{}:{}", e.action, e.entity_type))
            .collect()
    }
}

#[async_trait]
impl AuditRepository for MemoryAudit {
    async fn record(&self, entry: &AuditEntry) -> Result<(), DomainError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn find_recent(&self, limit: i64) -> Result<Vec<AuditEntry>, DomainError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.iter().rev().take(limit as usize).cloned().collect())
    }
}

/// Active beneficiary with a valid national ID and phone
pub fn beneficiary() -> Beneficiary {
    Beneficiary::register(NewBeneficiary {
        full_name: "عبدالله".to_string(),
        national_id: "1234567890".to_string(),
        phone: "0551234567".to_string(),
        email: None,
        iban: None,
        category: BeneficiaryCategory::Son,
        user_id: None,
    })
    .unwrap()
}

#[derive(Default)]
pub struct MemoryBeneficiaries {
    pub rows: Mutex<HashMap<Uuid, Beneficiary>>,
}

impl MemoryBeneficiaries {
    pub fn insert(&self, beneficiary: Beneficiary) {
        self.rows.lock().unwrap().insert(beneficiary.id, beneficiary);
    }
}

#[async_trait]
impl BeneficiaryRepository for MemoryBeneficiaries {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Beneficiary>, DomainError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Beneficiary>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|b| b.user_id == Some(user_id))
            .cloned())
    }

    async fn find_all(
        &self,
        status: Option<BeneficiaryStatus>,
    ) -> Result<Vec<Beneficiary>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect())
    }

    async fn save(&self, beneficiary: &Beneficiary) -> Result<Beneficiary, DomainError> {
        self.insert(beneficiary.clone());
        Ok(beneficiary.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryRequests {
    pub rows: Mutex<HashMap<Uuid, BeneficiaryRequest>>,
}

#[async_trait]
impl RequestRepository for MemoryRequests {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BeneficiaryRequest>, DomainError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_all(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<BeneficiaryRequest>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect())
    }

    async fn find_by_beneficiary(
        &self,
        beneficiary_id: Uuid,
    ) -> Result<Vec<BeneficiaryRequest>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.beneficiary_id == beneficiary_id)
            .cloned()
            .collect())
    }

    async fn save(&self, request: &BeneficiaryRequest) -> Result<BeneficiaryRequest, DomainError> {
        self.rows
            .lock()
            .unwrap()
            .insert(request.id, request.clone());
        Ok(request.clone())
    }
}

#[derive(Default)]
pub struct MemoryLedger {
    pub accounts: Mutex<Vec<Account>>,
    pub entries: Mutex<HashMap<Uuid, JournalEntry>>,
}

impl MemoryLedger {
    fn posted(&self) -> Vec<PostedLine> {
        let accounts = self.accounts.lock().unwrap();
        let entries = self.entries.lock().unwrap();
        let mut lines = Vec::new();
        for entry in entries.values().filter(|e| e.status == JournalStatus::Posted) {
            for line in &entry.lines {
                let Some(account) = accounts.iter().find(|a| a.id == line.account_id) else {
                    continue;
                };
                lines.push(PostedLine {
                    entry_id: entry.id,
                    entry_number: entry.entry_number.clone(),
                    entry_date: entry.entry_date,
                    account_id: account.id,
                    account_code: account.code.clone(),
                    account_name: account.name.clone(),
                    account_type: account.account_type,
                    debit: line.debit,
                    credit: line.credit,
                    description: line.description.clone(),
                });
            }
        }
        lines
    }
}

#[async_trait]
impl LedgerRepository for MemoryLedger {
    async fn find_accounts(&self) -> Result<Vec<Account>, DomainError> {
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn save_account(&self, account: &Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.code == account.code && a.id != account.id) {
            return Err(DomainError::conflict("account code already exists"));
        }
        accounts.retain(|a| a.id != account.id);
        accounts.push(account.clone());
        Ok(account.clone())
    }

    async fn find_entry(&self, id: Uuid) -> Result<Option<JournalEntry>, DomainError> {
        Ok(self.entries.lock().unwrap().get(&id).cloned())
    }

    async fn find_entries(
        &self,
        status: Option<JournalStatus>,
    ) -> Result<Vec<JournalEntry>, DomainError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .values()
            .filter(|e| status.map_or(true, |s| e.status == s))
            .cloned()
            .collect())
    }

    async fn save_entry(&self, entry: &JournalEntry) -> Result<JournalEntry, DomainError> {
        self.entries
            .lock()
            .unwrap()
            .insert(entry.id, entry.clone());
        Ok(entry.clone())
    }

    async fn delete_entry(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.entries.lock().unwrap().remove(&id).is_some())
    }

    async fn posted_lines(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<PostedLine>, DomainError> {
        Ok(self
            .posted()
            .into_iter()
            .filter(|l| from.map_or(true, |f| l.entry_date >= f))
            .filter(|l| to.map_or(true, |t| l.entry_date <= t))
            .collect())
    }

    async fn posted_lines_for_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<PostedLine>, DomainError> {
        Ok(self
            .posted()
            .into_iter()
            .filter(|l| l.account_id == account_id)
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryGovernance {
    pub decisions: Mutex<HashMap<Uuid, BoardDecision>>,
    pub votes: Mutex<Vec<Vote>>,
}

#[async_trait]
impl GovernanceRepository for MemoryGovernance {
    async fn find_decision(&self, id: Uuid) -> Result<Option<BoardDecision>, DomainError> {
        Ok(self.decisions.lock().unwrap().get(&id).cloned())
    }

    async fn find_decisions(
        &self,
        status: Option<DecisionStatus>,
    ) -> Result<Vec<BoardDecision>, DomainError> {
        Ok(self
            .decisions
            .lock()
            .unwrap()
            .values()
            .filter(|d| status.map_or(true, |s| d.status == s))
            .cloned()
            .collect())
    }

    async fn save_decision(&self, decision: &BoardDecision) -> Result<BoardDecision, DomainError> {
        self.decisions
            .lock()
            .unwrap()
            .insert(decision.id, decision.clone());
        Ok(decision.clone())
    }

    async fn find_votes(&self, decision_id: Uuid) -> Result<Vec<Vote>, DomainError> {
        Ok(self
            .votes
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.decision_id == decision_id)
            .cloned()
            .collect())
    }

    async fn save_vote(&self, vote: &Vote) -> Result<Vote, DomainError> {
        let mut votes = self.votes.lock().unwrap();
        votes.retain(|v| !(v.decision_id == vote.decision_id && v.voter_id == vote.voter_id));
        votes.push(vote.clone());
        Ok(vote.clone())
    }
}

/// Reader that counts full snapshot computations and can fail chosen slices
#[derive(Default)]
pub struct FakeKpiReader {
    pub beneficiaries: Vec<Beneficiary>,
    pub properties: Vec<Property>,
    pub contracts: Vec<Contract>,
    pub payments: Vec<RentalPayment>,
    pub funds: Vec<Fund>,
    pub loans: Vec<Loan>,
    pub failing_loans: bool,
    pub reads: AtomicUsize,
}

impl FakeKpiReader {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KpiReader for FakeKpiReader {
    async fn beneficiaries(&self) -> Result<Vec<Beneficiary>, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.beneficiaries.clone())
    }

    async fn properties(&self) -> Result<Vec<Property>, DomainError> {
        Ok(self.properties.clone())
    }

    async fn contracts(&self) -> Result<Vec<Contract>, DomainError> {
        Ok(self.contracts.clone())
    }

    async fn payments(&self) -> Result<Vec<RentalPayment>, DomainError> {
        Ok(self.payments.clone())
    }

    async fn posted_lines(&self) -> Result<Vec<PostedLine>, DomainError> {
        Ok(Vec::new())
    }

    async fn funds(&self) -> Result<Vec<Fund>, DomainError> {
        Ok(self.funds.clone())
    }

    async fn loans(&self) -> Result<Vec<Loan>, DomainError> {
        if self.failing_loans {
            return Err(DomainError::Repository("relation \"loans\" does not exist".to_string()));
        }
        Ok(self.loans.clone())
    }

    async fn requests(&self) -> Result<Vec<BeneficiaryRequest>, DomainError> {
        Ok(Vec::new())
    }

    async fn distributions(&self) -> Result<Vec<Distribution>, DomainError> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
pub struct MemoryProperties {
    pub rows: Mutex<HashMap<Uuid, Property>>,
}

#[async_trait]
impl PropertyRepository for MemoryProperties {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Property>, DomainError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Property>, DomainError> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn save(&self, property: &Property) -> Result<Property, DomainError> {
        self.rows
            .lock()
            .unwrap()
            .insert(property.id, property.clone());
        Ok(property.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
}

/// Contracts and payments kept in insertion order
#[derive(Default)]
pub struct MemoryContracts {
    pub contracts: Mutex<Vec<Contract>>,
    pub payments: Mutex<Vec<RentalPayment>>,
}

#[async_trait]
impl ContractRepository for MemoryContracts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contract>, DomainError> {
        Ok(self
            .contracts
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_all(&self, property_id: Option<Uuid>) -> Result<Vec<Contract>, DomainError> {
        Ok(self
            .contracts
            .lock()
            .unwrap()
            .iter()
            .filter(|c| property_id.map_or(true, |p| c.property_id == p))
            .cloned()
            .collect())
    }

    async fn save(&self, contract: &Contract) -> Result<Contract, DomainError> {
        let mut contracts = self.contracts.lock().unwrap();
        match contracts.iter_mut().find(|c| c.id == contract.id) {
            Some(existing) => *existing = contract.clone(),
            None => contracts.push(contract.clone()),
        }
        Ok(contract.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut contracts = self.contracts.lock().unwrap();
        let before = contracts.len();
        contracts.retain(|c| c.id != id);
        Ok(contracts.len() < before)
    }

    async fn expire_ended(&self, today: NaiveDate) -> Result<Vec<Contract>, DomainError> {
        let mut expired = Vec::new();
        for contract in self.contracts.lock().unwrap().iter_mut() {
            if contract.status == ContractStatus::Active && contract.end_date < today {
                contract.status = ContractStatus::Expired;
                expired.push(contract.clone());
            }
        }
        Ok(expired)
    }

    async fn find_payment(&self, id: Uuid) -> Result<Option<RentalPayment>, DomainError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_payments(
        &self,
        contract_id: Option<Uuid>,
    ) -> Result<Vec<RentalPayment>, DomainError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| contract_id.map_or(true, |c| p.contract_id == c))
            .cloned()
            .collect())
    }

    async fn find_payments_due(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RentalPayment>, DomainError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.due_date >= from && p.due_date <= to)
            .cloned()
            .collect())
    }

    async fn mark_overdue(&self, today: NaiveDate) -> Result<u64, DomainError> {
        let mut changed = 0;
        for payment in self.payments.lock().unwrap().iter_mut() {
            if payment.status == PaymentStatus::Pending && payment.due_date < today {
                payment.status = PaymentStatus::Overdue;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn save_payment(&self, payment: &RentalPayment) -> Result<RentalPayment, DomainError> {
        let mut payments = self.payments.lock().unwrap();
        match payments.iter_mut().find(|p| p.id == payment.id) {
            Some(existing) => *existing = payment.clone(),
            None => payments.push(payment.clone()),
        }
        Ok(payment.clone())
    }
}

#[derive(Default)]
pub struct MemoryTreasury {
    pub funds: Mutex<Vec<Fund>>,
    pub loans: Mutex<HashMap<Uuid, Loan>>,
}

#[async_trait]
impl TreasuryRepository for MemoryTreasury {
    async fn find_funds(&self) -> Result<Vec<Fund>, DomainError> {
        Ok(self.funds.lock().unwrap().clone())
    }

    async fn save_fund(&self, fund: &Fund) -> Result<Fund, DomainError> {
        let mut funds = self.funds.lock().unwrap();
        funds.retain(|f| f.id != fund.id);
        funds.push(fund.clone());
        Ok(fund.clone())
    }

    async fn find_loan(&self, id: Uuid) -> Result<Option<Loan>, DomainError> {
        Ok(self.loans.lock().unwrap().get(&id).cloned())
    }

    async fn find_loans(&self, beneficiary_id: Option<Uuid>) -> Result<Vec<Loan>, DomainError> {
        Ok(self
            .loans
            .lock()
            .unwrap()
            .values()
            .filter(|l| beneficiary_id.map_or(true, |b| l.beneficiary_id == b))
            .cloned()
            .collect())
    }

    async fn save_loan(&self, loan: &Loan) -> Result<Loan, DomainError> {
        self.loans.lock().unwrap().insert(loan.id, loan.clone());
        Ok(loan.clone())
    }

    async fn mark_defaulted(&self, today: NaiveDate) -> Result<u64, DomainError> {
        let mut changed = 0;
        for loan in self.loans.lock().unwrap().values_mut() {
            if loan.status == LoanStatus::Active && loan.due_date < today {
                loan.status = LoanStatus::Defaulted;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

/// Allocates equal shares to the listed recipients and counts settings reads
#[derive(Default)]
pub struct MemoryDistributions {
    pub recipients: Vec<Uuid>,
    pub settings: Mutex<Option<DistributionSettings>>,
    pub settings_reads: AtomicUsize,
    pub distributions: Mutex<HashMap<Uuid, Distribution>>,
    pub shares: Mutex<Vec<DistributionShare>>,
}

impl MemoryDistributions {
    pub fn with_recipients(recipients: Vec<Uuid>) -> Self {
        Self {
            recipients,
            ..Default::default()
        }
    }

    pub fn settings_reads(&self) -> usize {
        self.settings_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DistributionRepository for MemoryDistributions {
    async fn find_settings(&self) -> Result<Option<DistributionSettings>, DomainError> {
        self.settings_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn save_settings(
        &self,
        settings: &DistributionSettings,
    ) -> Result<DistributionSettings, DomainError> {
        *self.settings.lock().unwrap() = Some(settings.clone());
        Ok(settings.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Distribution>, DomainError> {
        Ok(self.distributions.lock().unwrap().get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Distribution>, DomainError> {
        Ok(self.distributions.lock().unwrap().values().cloned().collect())
    }

    async fn save(&self, distribution: &Distribution) -> Result<Distribution, DomainError> {
        self.distributions
            .lock()
            .unwrap()
            .insert(distribution.id, distribution.clone());
        Ok(distribution.clone())
    }

    async fn allocate(
        &self,
        input: &NewDistribution,
        created_by: Option<Uuid>,
    ) -> Result<Distribution, DomainError> {
        if self.recipients.is_empty() {
            return Err(DomainError::validation("no active beneficiaries"));
        }
        let distribution = Distribution {
            id: Uuid::new_v4(),
            period_label: input.period_label.clone(),
            distribution_date: input.distribution_date,
            total_amount: input.total_amount,
            beneficiaries_count: self.recipients.len() as i32,
            status: ApprovalStatus::Draft,
            created_by,
            created_at: Utc::now(),
        };
        let each = input.total_amount / Decimal::from(self.recipients.len() as u64);
        self.shares
            .lock()
            .unwrap()
            .extend(self.recipients.iter().map(|beneficiary_id| DistributionShare {
                id: Uuid::new_v4(),
                distribution_id: distribution.id,
                beneficiary_id: *beneficiary_id,
                amount: each,
                created_at: Utc::now(),
            }));
        self.save(&distribution).await
    }

    async fn find_shares(
        &self,
        distribution_id: Uuid,
    ) -> Result<Vec<DistributionShare>, DomainError> {
        Ok(self
            .shares
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.distribution_id == distribution_id)
            .cloned()
            .collect())
    }

    async fn find_shares_by_beneficiary(
        &self,
        beneficiary_id: Uuid,
    ) -> Result<Vec<DistributionShare>, DomainError> {
        Ok(self
            .shares
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.beneficiary_id == beneficiary_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryTickets {
    pub rows: Mutex<HashMap<Uuid, SupportTicket>>,
}

#[async_trait]
impl TicketRepository for MemoryTickets {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SupportTicket>, DomainError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_all(&self, created_by: Option<Uuid>) -> Result<Vec<SupportTicket>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|t| created_by.map_or(true, |u| t.created_by == u))
            .cloned()
            .collect())
    }

    async fn save(&self, ticket: &SupportTicket) -> Result<SupportTicket, DomainError> {
        self.rows.lock().unwrap().insert(ticket.id, ticket.clone());
        Ok(ticket.clone())
    }
}
