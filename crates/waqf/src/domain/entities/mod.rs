//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Beneficiary: Person entitled to a share of waqf income
//! - Property / Contract / RentalPayment: Real estate and its rent roll
//! - Account / JournalEntry: Double-entry bookkeeping
//! - Fund / Loan: Treasury
//! - DistributionSettings / Distribution: Heir distributions
//! - BeneficiaryRequest: Requests raised by beneficiaries
//! - BoardDecision / Vote: Governance
//! - ArchivedDocument: Document archive metadata
//! - SupportTicket: Help desk
//! - AuditEntry: Security trail

mod archive;
mod audit;
mod beneficiary;
mod contract;
mod distribution;
mod governance;
mod journal;
mod property;
mod request;
mod ticket;
mod treasury;

pub use archive::*;
pub use audit::*;
pub use beneficiary::*;
pub use contract::*;
pub use distribution::*;
pub use governance::*;
pub use journal::*;
pub use property::*;
pub use request::*;
pub use ticket::*;
pub use treasury::*;
