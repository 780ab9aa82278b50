//! Archive Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, ArchivedDocument, DocumentCategory};

#[async_trait]
pub trait ArchiveRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ArchivedDocument>, DomainError>;

    async fn find_all(
        &self,
        category: Option<DocumentCategory>,
    ) -> Result<Vec<ArchivedDocument>, DomainError>;

    async fn save(&self, document: &ArchivedDocument) -> Result<ArchivedDocument, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Number of documents per category (categories without documents omitted)
    async fn count_by_category(&self) -> Result<Vec<(DocumentCategory, i64)>, DomainError>;
}
