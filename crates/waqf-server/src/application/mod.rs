//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod archive_service;
mod audit;
mod beneficiary_service;
mod distribution_service;
mod governance_service;
mod kpi_service;
mod ledger_service;
mod notifier;
mod rental_service;
mod request_service;
mod status_sweep;
mod ticket_service;
mod treasury_service;

#[cfg(test)]
pub(crate) mod testing;

pub use archive_service::ArchiveService;
pub use audit::AuditTrail;
pub use beneficiary_service::BeneficiaryService;
pub use distribution_service::{DistributionDetail, DistributionService};
pub use governance_service::{DecisionDetail, GovernanceService};
pub use kpi_service::{KpiService, KPI_CACHE_KEY};
pub use ledger_service::LedgerService;
pub use notifier::{FunctionsHealth, Notifier};
pub use rental_service::RentalService;
pub use request_service::RequestService;
pub use status_sweep::{StatusSweeper, SweepConfig};
pub use ticket_service::TicketService;
pub use treasury_service::TreasuryService;
