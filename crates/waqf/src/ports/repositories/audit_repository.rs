//! Audit Repository Port

use async_trait::async_trait;

use crate::domain::{errors::DomainError, AuditEntry};

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn record(&self, entry: &AuditEntry) -> Result<(), DomainError>;

    /// Most recent entries first
    async fn find_recent(&self, limit: i64) -> Result<Vec<AuditEntry>, DomainError>;
}
