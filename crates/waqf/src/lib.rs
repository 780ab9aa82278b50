//! Waqf Domain Library
//!
//! Core domain types and interfaces for the waqf (endowment) management
//! platform: beneficiaries, properties and rent, double-entry accounting,
//! revenue distribution, approvals, governance and support.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Beneficiary, Property, Contract, JournalEntry, ...)
//!   - `value_objects/`: Immutable value types (UserRole, Permission, ApprovalStatus, ...)
//!   - `services/`: Stateless rules (validation, accounting, KPI reduction, tallying)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!   - `services/`: External service interfaces
//!
//! # Usage
//!
//! ```rust,ignore
//! use waqf::domain::{Beneficiary, JournalEntry, UserRole};
//! use waqf::ports::{BeneficiaryRepository, KpiReader};
//! ```

#[macro_use]
mod macros;

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::services::kpi::KpiSnapshot;
pub use domain::{
    AccountType, ApprovalAction, ApprovalStatus, Beneficiary, BeneficiaryRequest, Contract,
    Distribution, DistributionSettings, DomainError, ErrorCategory, Frequency, JournalEntry,
    Permission, Property, RentalPayment, UserRole,
};
pub use ports::{
    // Services
    EdgeFunctions,
    Notification,
    // Repositories
    ArchiveRepository,
    AuditRepository,
    BeneficiaryRepository,
    ContractRepository,
    DistributionRepository,
    GovernanceRepository,
    KpiReader,
    LedgerRepository,
    PropertyRepository,
    RequestRepository,
    TicketRepository,
    TreasuryRepository,
};
