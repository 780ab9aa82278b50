//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod archive_repository;
mod audit_repository;
mod beneficiary_repository;
mod contract_repository;
mod distribution_repository;
mod governance_repository;
mod kpi_reader;
mod ledger_repository;
mod property_repository;
mod request_repository;
mod ticket_repository;
mod treasury_repository;

pub use archive_repository::*;
pub use audit_repository::*;
pub use beneficiary_repository::*;
pub use contract_repository::*;
pub use distribution_repository::*;
pub use governance_repository::*;
pub use kpi_reader::*;
pub use ledger_repository::*;
pub use property_repository::*;
pub use request_repository::*;
pub use ticket_repository::*;
pub use treasury_repository::*;
