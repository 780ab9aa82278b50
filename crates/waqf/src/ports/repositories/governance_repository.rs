//! Governance Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, BoardDecision, DecisionStatus, Vote};

#[async_trait]
pub trait GovernanceRepository: Send + Sync {
    async fn find_decision(&self, id: Uuid) -> Result<Option<BoardDecision>, DomainError>;

    async fn find_decisions(
        &self,
        status: Option<DecisionStatus>,
    ) -> Result<Vec<BoardDecision>, DomainError>;

    async fn save_decision(&self, decision: &BoardDecision) -> Result<BoardDecision, DomainError>;

    async fn find_votes(&self, decision_id: Uuid) -> Result<Vec<Vote>, DomainError>;

    /// Insert a vote, replacing the voter's earlier choice on the same decision
    async fn save_vote(&self, vote: &Vote) -> Result<Vote, DomainError>;
}
