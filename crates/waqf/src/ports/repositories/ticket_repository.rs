//! SupportTicket Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, SupportTicket};

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SupportTicket>, DomainError>;

    /// All tickets, or only those opened by `created_by`
    async fn find_all(&self, created_by: Option<Uuid>) -> Result<Vec<SupportTicket>, DomainError>;

    async fn save(&self, ticket: &SupportTicket) -> Result<SupportTicket, DomainError>;
}
