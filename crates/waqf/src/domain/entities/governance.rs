//! Governance - Board decisions and votes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::services::governance;

text_enum! {
    pub enum DecisionStatus {
        Open => "open",
        Closed => "closed",
    }
}

text_enum! {
    pub enum DecisionOutcome {
        Approved => "approved",
        Rejected => "rejected",
        NoQuorum => "no_quorum",
    }
}

text_enum! {
    pub enum VoteChoice {
        Approve => "approve",
        Reject => "reject",
        Abstain => "abstain",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardDecision {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: DecisionStatus,
    pub outcome: Option<DecisionOutcome>,
    /// Votes (abstentions included) needed for the outcome to count
    pub quorum: i32,
    pub voting_deadline: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewBoardDecision {
    pub title: String,
    pub description: String,
    pub quorum: Option<i32>,
    pub voting_deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Vote {
    pub decision_id: Uuid,
    pub voter_id: Uuid,
    pub choice: VoteChoice,
    pub cast_at: DateTime<Utc>,
}

impl BoardDecision {
    pub fn new(input: NewBoardDecision, created_by: Option<Uuid>) -> Result<Self, DomainError> {
        if input.title.trim().is_empty() {
            return Err(DomainError::validation("title is required"));
        }
        let quorum = input.quorum.unwrap_or(3);
        if quorum < 1 {
            return Err(DomainError::validation("quorum must be at least 1"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title: input.title.trim().to_string(),
            description: input.description,
            status: DecisionStatus::Open,
            outcome: None,
            quorum,
            voting_deadline: input.voting_deadline,
            created_by,
            created_at: Utc::now(),
            closed_at: None,
        })
    }

    /// A vote is accepted only while the decision is open and before its deadline
    pub fn accept_vote(
        &self,
        voter_id: Uuid,
        choice: VoteChoice,
        now: DateTime<Utc>,
    ) -> Result<Vote, DomainError> {
        if self.status != DecisionStatus::Open {
            return Err(DomainError::conflict("Voting is closed for this decision"));
        }
        if let Some(deadline) = self.voting_deadline {
            if now > deadline {
                return Err(DomainError::conflict("Voting deadline has passed"));
            }
        }
        Ok(Vote {
            decision_id: self.id,
            voter_id,
            choice,
            cast_at: now,
        })
    }

    /// Close voting and record the tallied outcome
    pub fn close(mut self, votes: &[Vote]) -> Result<Self, DomainError> {
        if self.status == DecisionStatus::Closed {
            return Err(DomainError::conflict("Decision is already closed"));
        }
        let tally = governance::tally(votes, self.quorum);
        self.outcome = Some(tally.outcome);
        self.status = DecisionStatus::Closed;
        self.closed_at = Some(Utc::now());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn decision() -> BoardDecision {
        BoardDecision::new(
            NewBoardDecision {
                title: "اعتماد الميزانية".to_string(),
                description: String::new(),
                quorum: Some(2),
                voting_deadline: Some(Utc::now() + Duration::days(1)),
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_vote_after_deadline_conflicts() {
        let d = decision();
        let late = Utc::now() + Duration::days(2);
        assert!(d.accept_vote(Uuid::new_v4(), VoteChoice::Approve, late).is_err());
        assert!(d
            .accept_vote(Uuid::new_v4(), VoteChoice::Approve, Utc::now())
            .is_ok());
    }

    #[test]
    fn test_close_sets_outcome_and_blocks_votes() {
        let d = decision();
        let votes = vec![
            d.accept_vote(Uuid::new_v4(), VoteChoice::Approve, Utc::now()).unwrap(),
            d.accept_vote(Uuid::new_v4(), VoteChoice::Approve, Utc::now()).unwrap(),
        ];
        let closed = d.close(&votes).unwrap();
        assert_eq!(closed.outcome, Some(DecisionOutcome::Approved));
        assert!(closed
            .accept_vote(Uuid::new_v4(), VoteChoice::Reject, Utc::now())
            .is_err());
        assert!(closed.close(&votes).is_err());
    }
}
