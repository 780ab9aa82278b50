//! SupportTicket - Help desk tickets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::errors::DomainError;

text_enum! {
    pub enum TicketPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

text_enum! {
    pub enum TicketStatus {
        Open => "open",
        InProgress => "in_progress",
        Resolved => "resolved",
        Closed => "closed",
    }
}

impl TicketStatus {
    pub fn can_move_to(&self, next: TicketStatus) -> bool {
        use TicketStatus::*;
        matches!(
            (self, next),
            (Open, InProgress)
                | (Open, Closed)
                | (InProgress, Resolved)
                | (InProgress, Open)
                | (Resolved, Closed)
                | (Resolved, Open)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SupportTicket {
    pub id: Uuid,
    pub subject: String,
    pub description: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub created_by: Uuid,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewSupportTicket {
    pub subject: String,
    pub description: String,
    pub priority: Option<TicketPriority>,
}

impl SupportTicket {
    pub fn open(input: NewSupportTicket, created_by: Uuid) -> Result<Self, DomainError> {
        if input.subject.trim().is_empty() {
            return Err(DomainError::validation("subject is required"));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            subject: input.subject.trim().to_string(),
            description: input.description,
            priority: input.priority.unwrap_or(TicketPriority::Medium),
            status: TicketStatus::Open,
            created_by,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn move_to(mut self, next: TicketStatus) -> Result<Self, DomainError> {
        if !self.status.can_move_to(next) {
            return Err(DomainError::conflict(format!(
                "Cannot move ticket from {} to {}",
                self.status, next
            )));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(self)
    }

    pub fn assign(mut self, assignee: Uuid) -> Self {
        self.assigned_to = Some(assignee);
        self.updated_at = Utc::now();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> SupportTicket {
        SupportTicket::open(
            NewSupportTicket {
                subject: "لا يظهر كشف الحساب".to_string(),
                description: String::new(),
                priority: None,
            },
            Uuid::new_v4(),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let t = ticket();
        assert_eq!(t.priority, TicketPriority::Medium);
        assert_eq!(t.status, TicketStatus::Open);
    }

    #[test]
    fn test_lifecycle() {
        let t = ticket()
            .move_to(TicketStatus::InProgress)
            .and_then(|t| t.move_to(TicketStatus::Resolved))
            .and_then(|t| t.move_to(TicketStatus::Closed))
            .unwrap();
        assert_eq!(t.status, TicketStatus::Closed);
        assert!(t.move_to(TicketStatus::Open).is_err());
    }

    #[test]
    fn test_cannot_resolve_unstarted() {
        assert!(ticket().move_to(TicketStatus::Resolved).is_err());
    }
}
