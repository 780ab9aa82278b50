//! Archive Application Service
//!
//! Only metadata lives here; the files themselves sit in external object
//! storage under `storage_path`.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use waqf::domain::{ArchivedDocument, DocumentCategory, NewArchivedDocument};
use waqf::{ArchiveRepository, DomainError};

use super::AuditTrail;

pub struct ArchiveService<A: ArchiveRepository> {
    repo: Arc<A>,
    audit: AuditTrail,
}

impl<A: ArchiveRepository> ArchiveService<A> {
    pub fn new(repo: Arc<A>, audit: AuditTrail) -> Self {
        Self { repo, audit }
    }

    pub async fn list(
        &self,
        category: Option<DocumentCategory>,
    ) -> Result<Vec<ArchivedDocument>, DomainError> {
        self.repo.find_all(category).await
    }

    pub async fn get(&self, id: Uuid) -> Result<ArchivedDocument, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("ArchivedDocument", id))
    }

    pub async fn create(
        &self,
        input: NewArchivedDocument,
        actor: Option<Uuid>,
    ) -> Result<ArchivedDocument, DomainError> {
        let saved = self.repo.save(&ArchivedDocument::new(input, actor)?).await?;
        tracing::info!("Archived {} document: {}", saved.category, saved.title);
        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid, actor: Option<Uuid>) -> Result<bool, DomainError> {
        let document = self.get(id).await?;
        let deleted = self.repo.delete(id).await?;
        if deleted {
            tracing::info!("Removed archived document: {}", document.title);
            self.audit
                .record(
                    actor,
                    "delete",
                    "archived_document",
                    Some(id),
                    json!({ "title": document.title, "storage_path": document.storage_path }),
                )
                .await;
        }
        Ok(deleted)
    }

    /// Document totals per category, zero-filled
    pub async fn totals(&self) -> Result<Vec<(DocumentCategory, i64)>, DomainError> {
        let counts = self.repo.count_by_category().await?;
        Ok(DocumentCategory::ALL
            .iter()
            .map(|category| {
                let count = counts
                    .iter()
                    .find(|(c, _)| c == category)
                    .map_or(0, |(_, n)| *n);
                (*category, count)
            })
            .collect())
    }
}
