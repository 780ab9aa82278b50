//! Governance Application Service - Board decisions and voting

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use waqf::domain::services::governance::{tally, Tally};
use waqf::domain::{BoardDecision, DecisionStatus, NewBoardDecision, Vote, VoteChoice};
use waqf::{DomainError, GovernanceRepository};

use super::AuditTrail;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DecisionDetail {
    pub decision: BoardDecision,
    pub votes: Vec<Vote>,
    /// Running tally; the stored outcome is authoritative once closed
    pub tally: Tally,
}

pub struct GovernanceService<G: GovernanceRepository> {
    repo: Arc<G>,
    audit: AuditTrail,
}

impl<G: GovernanceRepository> GovernanceService<G> {
    pub fn new(repo: Arc<G>, audit: AuditTrail) -> Self {
        Self { repo, audit }
    }

    pub async fn list(&self, status: Option<DecisionStatus>) -> Result<Vec<BoardDecision>, DomainError> {
        self.repo.find_decisions(status).await
    }

    async fn decision(&self, id: Uuid) -> Result<BoardDecision, DomainError> {
        self.repo
            .find_decision(id)
            .await?
            .ok_or_else(|| DomainError::not_found("BoardDecision", id))
    }

    pub async fn detail(&self, id: Uuid) -> Result<DecisionDetail, DomainError> {
        let decision = self.decision(id).await?;
        let votes = self.repo.find_votes(id).await?;
        let tally = tally(&votes, decision.quorum);
        Ok(DecisionDetail {
            decision,
            votes,
            tally,
        })
    }

    pub async fn create(
        &self,
        input: NewBoardDecision,
        actor: Option<Uuid>,
    ) -> Result<BoardDecision, DomainError> {
        let saved = self.repo.save_decision(&BoardDecision::new(input, actor)?).await?;
        tracing::info!("Opened board decision: {} ({})", saved.title, saved.id);
        Ok(saved)
    }

    /// Cast or replace the voter's choice while voting is open
    pub async fn vote(
        &self,
        id: Uuid,
        voter_id: Uuid,
        choice: VoteChoice,
    ) -> Result<DecisionDetail, DomainError> {
        let decision = self.decision(id).await?;
        let vote = decision.accept_vote(voter_id, choice, Utc::now())?;
        self.repo.save_vote(&vote).await?;
        tracing::info!("Vote {} on decision {}", choice, id);
        self.detail(id).await
    }

    pub async fn close(&self, id: Uuid, actor: Option<Uuid>) -> Result<DecisionDetail, DomainError> {
        let decision = self.decision(id).await?;
        let votes = self.repo.find_votes(id).await?;
        let closed = self.repo.save_decision(&decision.close(&votes)?).await?;

        tracing::info!("Closed decision {} with outcome {:?}", closed.title, closed.outcome);
        self.audit
            .record(actor, "close", "board_decision", Some(id), json!({ "outcome": closed.outcome }))
            .await;
        self.detail(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{MemoryAudit, MemoryGovernance};
    use waqf::domain::DecisionOutcome;

    fn service() -> GovernanceService<MemoryGovernance> {
        GovernanceService::new(
            Arc::new(MemoryGovernance::default()),
            AuditTrail::new(Arc::new(MemoryAudit::default())),
        )
    }

    async fn open(service: &GovernanceService<MemoryGovernance>, quorum: i32) -> BoardDecision {
        service
            .create(
                NewBoardDecision {
                    title: "صيانة العمارة".to_string(),
                    description: "اعتماد ميزانية الصيانة".to_string(),
                    quorum: Some(quorum),
                    voting_deadline: None,
                },
                None,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_revote_replaces_choice() {
        let service = service();
        let decision = open(&service, 1).await;
        let voter = Uuid::new_v4();
        service.vote(decision.id, voter, VoteChoice::Reject).await.unwrap();
        let detail = service.vote(decision.id, voter, VoteChoice::Approve).await.unwrap();
        assert_eq!(detail.votes.len(), 1);
        assert_eq!(detail.tally.approve, 1);
        assert_eq!(detail.tally.reject, 0);
    }

    #[tokio::test]
    async fn test_close_records_outcome_and_blocks_votes() {
        let service = service();
        let decision = open(&service, 3).await;
        service.vote(decision.id, Uuid::new_v4(), VoteChoice::Approve).await.unwrap();
        service.vote(decision.id, Uuid::new_v4(), VoteChoice::Abstain).await.unwrap();

        let closed = service.close(decision.id, None).await.unwrap();
        assert_eq!(closed.decision.outcome, Some(DecisionOutcome::NoQuorum));
        assert_eq!(closed.decision.status, DecisionStatus::Closed);

        let late = service.vote(decision.id, Uuid::new_v4(), VoteChoice::Approve).await;
        assert!(matches!(late, Err(DomainError::Conflict(_))));
    }
}
