//! PostgreSQL Repository Implementations

use std::str::FromStr;

use waqf::DomainError;

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

pub use archive_repository::PgArchiveRepository;
pub use audit_repository::PgAuditRepository;
pub use beneficiary_repository::PgBeneficiaryRepository;
pub use contract_repository::PgContractRepository;
pub use distribution_repository::PgDistributionRepository;
pub use governance_repository::PgGovernanceRepository;
pub use kpi_reader::PgKpiReader;
pub use ledger_repository::PgLedgerRepository;
pub use property_repository::PgPropertyRepository;
pub use request_repository::PgRequestRepository;
pub use ticket_repository::PgTicketRepository;
pub use treasury_repository::PgTreasuryRepository;

fn db_err(e: sqlx::Error) -> DomainError {
    DomainError::Repository(e.to_string())
}

/// Parse a TEXT column into one of the domain's text enums
fn parse_text<T>(column: &str, value: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = DomainError>,
{
    value
        .parse()
        .map_err(|_| DomainError::Repository(format!("unexpected {column} value: {value}")))
}

/// Convert fetched rows, failing on the first row that does not map
fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, DomainError>
where
    T: TryFrom<R, Error = DomainError>,
{
    rows.into_iter().map(T::try_from).collect()
}
