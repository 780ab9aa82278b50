//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod edge_functions;
pub mod postgres;
pub mod realtime;

// Re-exports
pub use edge_functions::HttpEdgeFunctions;
pub use postgres::{
    PgArchiveRepository, PgAuditRepository, PgBeneficiaryRepository, PgContractRepository,
    PgDistributionRepository, PgGovernanceRepository, PgKpiReader, PgLedgerRepository,
    PgPropertyRepository, PgRequestRepository, PgTicketRepository, PgTreasuryRepository,
};
