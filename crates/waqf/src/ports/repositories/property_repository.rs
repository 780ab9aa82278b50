//! Property Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Property};

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Property>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Property>, DomainError>;

    /// Save a property (insert or update)
    async fn save(&self, property: &Property) -> Result<Property, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
