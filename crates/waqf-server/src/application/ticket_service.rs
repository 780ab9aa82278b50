//! Support Ticket Application Service
//!
//! Creators see their own tickets; handlers see and move all of them.

use std::sync::Arc;

use uuid::Uuid;

use waqf::domain::{NewSupportTicket, SupportTicket, TicketStatus};
use waqf::{DomainError, Permission, TicketRepository};

use crate::auth::AuthUser;

pub struct TicketService<T: TicketRepository> {
    repo: Arc<T>,
}

impl<T: TicketRepository> TicketService<T> {
    pub fn new(repo: Arc<T>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, user: &AuthUser) -> Result<Vec<SupportTicket>, DomainError> {
        let scope = (!user.can(Permission::HandleTickets)).then_some(user.id);
        self.repo.find_all(scope).await
    }

    pub async fn get(&self, id: Uuid, user: &AuthUser) -> Result<SupportTicket, DomainError> {
        let ticket = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("SupportTicket", id))?;
        if ticket.created_by != user.id && !user.can(Permission::HandleTickets) {
            return Err(DomainError::forbidden("ticket belongs to another user"));
        }
        Ok(ticket)
    }

    pub async fn open(
        &self,
        input: NewSupportTicket,
        user: &AuthUser,
    ) -> Result<SupportTicket, DomainError> {
        let saved = self.repo.save(&SupportTicket::open(input, user.id)?).await?;
        tracing::info!("Opened {} ticket: {}", saved.priority, saved.subject);
        Ok(saved)
    }

    /// Creators may only close or reopen their own tickets
    pub async fn move_to(
        &self,
        id: Uuid,
        status: TicketStatus,
        user: &AuthUser,
    ) -> Result<SupportTicket, DomainError> {
        let ticket = self.get(id, user).await?;
        let handler = user.can(Permission::HandleTickets);
        if !handler && !matches!(status, TicketStatus::Closed | TicketStatus::Open) {
            return Err(DomainError::forbidden(format!(
                "only support staff can move tickets to {status}"
            )));
        }
        let from = ticket.status;
        let saved = self.repo.save(&ticket.move_to(status)?).await?;
        tracing::info!("Ticket {} {} -> {}", id, from, saved.status);
        Ok(saved)
    }

    pub async fn assign(&self, id: Uuid, assignee: Uuid, user: &AuthUser) -> Result<SupportTicket, DomainError> {
        let ticket = self.get(id, user).await?;
        self.repo.save(&ticket.assign(assignee)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::MemoryTickets;
    use waqf::UserRole;

    fn user(role: UserRole) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: None,
            role,
        }
    }

    fn report() -> NewSupportTicket {
        NewSupportTicket {
            subject: "لم يصل إشعار التوزيع".to_string(),
            description: String::new(),
            priority: None,
        }
    }

    #[tokio::test]
    async fn test_creator_may_only_close_or_reopen() {
        let service = TicketService::new(Arc::new(MemoryTickets::default()));
        let creator = user(UserRole::Beneficiary);
        let ticket = service.open(report(), &creator).await.unwrap();

        let result = service.move_to(ticket.id, TicketStatus::InProgress, &creator).await;
        assert!(matches!(result, Err(DomainError::Forbidden(_))));

        let closed = service.move_to(ticket.id, TicketStatus::Closed, &creator).await.unwrap();
        assert_eq!(closed.status, TicketStatus::Closed);

        // Closed is terminal even for the creator
        let reopened = service.move_to(ticket.id, TicketStatus::Open, &creator).await;
        assert!(matches!(reopened, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_handler_moves_any_ticket() {
        let service = TicketService::new(Arc::new(MemoryTickets::default()));
        let creator = user(UserRole::Beneficiary);
        let nazer = user(UserRole::Nazer);
        let ticket = service.open(report(), &creator).await.unwrap();

        service.move_to(ticket.id, TicketStatus::InProgress, &nazer).await.unwrap();
        let resolved = service.move_to(ticket.id, TicketStatus::Resolved, &nazer).await.unwrap();
        assert_eq!(resolved.status, TicketStatus::Resolved);

        // The creator can reopen a resolved ticket
        let reopened = service.move_to(ticket.id, TicketStatus::Open, &creator).await.unwrap();
        assert_eq!(reopened.status, TicketStatus::Open);
    }

    #[tokio::test]
    async fn test_other_users_cannot_see_ticket() {
        let service = TicketService::new(Arc::new(MemoryTickets::default()));
        let creator = user(UserRole::Beneficiary);
        let stranger = user(UserRole::Beneficiary);
        let ticket = service.open(report(), &creator).await.unwrap();

        let result = service.move_to(ticket.id, TicketStatus::Closed, &stranger).await;
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
        assert!(service.list(&stranger).await.unwrap().is_empty());
        assert_eq!(service.list(&user(UserRole::Admin)).await.unwrap().len(), 1);
    }
}
