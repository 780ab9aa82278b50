//! ArchivedDocument - Metadata of files kept in external object storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::errors::DomainError;

text_enum! {
    pub enum DocumentCategory {
        Contract => "contract",
        Deed => "deed",
        Financial => "financial",
        Decision => "decision",
        Identity => "identity",
        Other => "other",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArchivedDocument {
    pub id: Uuid,
    pub title: String,
    pub category: DocumentCategory,
    /// Object key in the storage bucket
    pub storage_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    /// Kind of record the document belongs to (`contract`, `beneficiary`, ...)
    pub related_entity: Option<String>,
    pub related_id: Option<Uuid>,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewArchivedDocument {
    pub title: String,
    pub category: DocumentCategory,
    pub storage_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub related_entity: Option<String>,
    pub related_id: Option<Uuid>,
}

impl ArchivedDocument {
    pub fn new(input: NewArchivedDocument, uploaded_by: Option<Uuid>) -> Result<Self, DomainError> {
        if input.title.trim().is_empty() {
            return Err(DomainError::validation("title is required"));
        }
        if input.storage_path.trim().is_empty() {
            return Err(DomainError::validation("storage_path is required"));
        }
        if input.size_bytes < 0 {
            return Err(DomainError::validation("size_bytes must be non-negative"));
        }
        if input.related_id.is_some() && input.related_entity.is_none() {
            return Err(DomainError::validation(
                "related_entity is required when related_id is set",
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title: input.title.trim().to_string(),
            category: input.category,
            storage_path: input.storage_path.trim().to_string(),
            mime_type: input.mime_type,
            size_bytes: input.size_bytes,
            related_entity: input.related_entity,
            related_id: input.related_id,
            uploaded_by,
            created_at: Utc::now(),
        })
    }
}
