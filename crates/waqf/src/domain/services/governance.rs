//! Governance - Vote tallying

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::entities::{DecisionOutcome, Vote, VoteChoice};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Tally {
    pub approve: i32,
    pub reject: i32,
    pub abstain: i32,
    pub outcome: DecisionOutcome,
}

/// Abstentions count toward quorum but not toward the majority; ties reject.
pub fn tally(votes: &[Vote], quorum: i32) -> Tally {
    let count = |choice: VoteChoice| votes.iter().filter(|v| v.choice == choice).count() as i32;
    let approve = count(VoteChoice::Approve);
    let reject = count(VoteChoice::Reject);
    let abstain = count(VoteChoice::Abstain);

    let outcome = if approve + reject + abstain < quorum {
        DecisionOutcome::NoQuorum
    } else if approve > reject {
        DecisionOutcome::Approved
    } else {
        DecisionOutcome::Rejected
    };

    Tally {
        approve,
        reject,
        abstain,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn votes(choices: &[VoteChoice]) -> Vec<Vote> {
        let decision_id = Uuid::new_v4();
        choices
            .iter()
            .map(|c| Vote {
                decision_id,
                voter_id: Uuid::new_v4(),
                choice: *c,
                cast_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn test_no_quorum() {
        let t = tally(&votes(&[VoteChoice::Approve, VoteChoice::Approve]), 3);
        assert_eq!(t.outcome, DecisionOutcome::NoQuorum);
    }

    #[test]
    fn test_abstentions_reach_quorum() {
        use VoteChoice::*;
        let t = tally(&votes(&[Approve, Abstain, Abstain]), 3);
        assert_eq!(t.outcome, DecisionOutcome::Approved);
        assert_eq!(t.abstain, 2);
    }

    #[test]
    fn test_tie_rejects() {
        use VoteChoice::*;
        let t = tally(&votes(&[Approve, Reject, Abstain]), 3);
        assert_eq!(t.outcome, DecisionOutcome::Rejected);
    }
}
