//! Audit trail
//!
//! Records who changed what. A failed write is logged and never fails the
//! operation being audited.

use std::sync::Arc;

use uuid::Uuid;

use waqf::domain::AuditEntry;
use waqf::{AuditRepository, DomainError};

#[derive(Clone)]
pub struct AuditTrail {
    repo: Arc<dyn AuditRepository>,
}

impl AuditTrail {
    pub fn new(repo: Arc<dyn AuditRepository>) -> Self {
        Self { repo }
    }

    pub async fn record(
        &self,
        actor_id: Option<Uuid>,
        action: &str,
        entity_type: &str,
        entity_id: Option<Uuid>,
        details: serde_json::Value,
    ) {
        let entry = AuditEntry::new(actor_id, action, entity_type, entity_id, details);
        if let Err(e) = self.repo.record(&entry).await {
            tracing::warn!("Failed to record audit entry {action} {entity_type}: {e}");
        }
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<AuditEntry>, DomainError> {
        self.repo.find_recent(limit.clamp(1, 500)).await
    }
}
