use crate::agent::AgentId;
use crate::tier::Tier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lower bound of every reputation score dimension.
pub const SCORE_FLOOR: f64 = 0.0;
/// Upper bound of every reputation score dimension.
pub const SCORE_CEILING: f64 = 100.0;
/// Starting score for a fresh agent, the neutral midpoint.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Clamp a score into the valid `[SCORE_FLOOR, SCORE_CEILING]` domain.
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(SCORE_FLOOR, SCORE_CEILING)
}

/// Aggregate reputation state for one agent.
///
/// This is derived state: the event log is the source of truth, and the
/// whole record can be rebuilt by replaying an agent's events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationRecord {
    pub agent_id: AgentId,
    pub overall_score: f64,
    pub quality_score: f64,
    pub reliability_score: f64,
    pub speed_score: f64,
    pub communication_score: f64,
    pub tier: Tier,
    pub badges: Vec<String>,
    pub completed_bounties: u64,
    pub failed_bounties: u64,
    pub total_reviews: u64,
    pub positive_reviews: u64,
    pub neutral_reviews: u64,
    pub negative_reviews: u64,
    pub disputes_won: u64,
    pub disputes_lost: u64,
    /// Running mean of completion times in seconds, `None` until sampled.
    pub avg_completion_secs: Option<f64>,
    /// Running mean of response times in seconds, `None` until sampled.
    pub avg_response_secs: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReputationRecord {
    /// A fresh record: all scores at the neutral midpoint, bronze tier,
    /// every counter zero.
    pub fn new(agent_id: AgentId) -> Self {
        let now = Utc::now();
        Self {
            agent_id,
            overall_score: NEUTRAL_SCORE,
            quality_score: NEUTRAL_SCORE,
            reliability_score: NEUTRAL_SCORE,
            speed_score: NEUTRAL_SCORE,
            communication_score: NEUTRAL_SCORE,
            tier: Tier::Bronze,
            badges: Vec::new(),
            completed_bounties: 0,
            failed_bounties: 0,
            total_reviews: 0,
            positive_reviews: 0,
            neutral_reviews: 0,
            negative_reviews: 0,
            disputes_won: 0,
            disputes_lost: 0,
            avg_completion_secs: None,
            avg_response_secs: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Count of terminal bounty outcomes attributed to this agent.
    pub fn terminal_bounties(&self) -> u64 {
        self.completed_bounties + self.failed_bounties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-12.5), 0.0);
        assert_eq!(clamp_score(0.0), 0.0);
        assert_eq!(clamp_score(42.0), 42.0);
        assert_eq!(clamp_score(100.0), 100.0);
        assert_eq!(clamp_score(317.0), 100.0);
    }

    #[test]
    fn test_new_record_is_neutral() {
        let record = ReputationRecord::new(AgentId::new("agent-1"));
        assert_eq!(record.overall_score, NEUTRAL_SCORE);
        assert_eq!(record.tier, Tier::Bronze);
        assert_eq!(record.terminal_bounties(), 0);
        assert_eq!(record.total_reviews, 0);
        assert!(record.badges.is_empty());
        assert!(record.avg_completion_secs.is_none());
        assert!(record.avg_response_secs.is_none());
    }

    #[test]
    fn test_record_serde_round_trip() {
        let record = ReputationRecord::new(AgentId::new("agent-7"));
        let json = serde_json::to_string(&record).unwrap();
        let back: ReputationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
