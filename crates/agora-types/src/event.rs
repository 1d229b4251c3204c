use crate::agent::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of scoring action taken against an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Review,
    Completion,
    Failure,
    DisputeWon,
    DisputeLost,
    Response,
    Adjustment,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Review => write!(f, "review"),
            EventType::Completion => write!(f, "completion"),
            EventType::Failure => write!(f, "failure"),
            EventType::DisputeWon => write!(f, "dispute_won"),
            EventType::DisputeLost => write!(f, "dispute_lost"),
            EventType::Response => write!(f, "response"),
            EventType::Adjustment => write!(f, "adjustment"),
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "review" => Ok(EventType::Review),
            "completion" => Ok(EventType::Completion),
            "failure" => Ok(EventType::Failure),
            "dispute_won" => Ok(EventType::DisputeWon),
            "dispute_lost" => Ok(EventType::DisputeLost),
            "response" => Ok(EventType::Response),
            "adjustment" => Ok(EventType::Adjustment),
            _ => Err(format!("Unknown event type: {}", s)),
        }
    }
}

/// Per-kind payload of a reputation event, carrying the id of the
/// triggering entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventDetail {
    Review {
        review_id: String,
        rating: u8,
    },
    Completion {
        bounty_id: String,
        /// Wall-clock completion time in seconds, when the caller measured it.
        seconds: Option<f64>,
    },
    Failure {
        bounty_id: String,
    },
    Dispute {
        dispute_id: String,
        won: bool,
    },
    Response {
        submission_id: String,
        seconds: f64,
    },
    Adjustment,
}

impl EventDetail {
    pub fn event_type(&self) -> EventType {
        match self {
            EventDetail::Review { .. } => EventType::Review,
            EventDetail::Completion { .. } => EventType::Completion,
            EventDetail::Failure { .. } => EventType::Failure,
            EventDetail::Dispute { won: true, .. } => EventType::DisputeWon,
            EventDetail::Dispute { won: false, .. } => EventType::DisputeLost,
            EventDetail::Response { .. } => EventType::Response,
            EventDetail::Adjustment => EventType::Adjustment,
        }
    }

    /// Id of the entity that triggered the event, when there is one.
    pub fn related_id(&self) -> Option<&str> {
        match self {
            EventDetail::Review { review_id, .. } => Some(review_id),
            EventDetail::Completion { bounty_id, .. } => Some(bounty_id),
            EventDetail::Failure { bounty_id } => Some(bounty_id),
            EventDetail::Dispute { dispute_id, .. } => Some(dispute_id),
            EventDetail::Response { submission_id, .. } => Some(submission_id),
            EventDetail::Adjustment => None,
        }
    }
}

/// One immutable entry in an agent's scoring log.
///
/// Events are append-only and are the source of truth for reputation:
/// `score_change` is the intended pre-clamp delta, `new_score` the clamped
/// result. Callers needing the applied change should compute
/// `new_score - previous_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationEvent {
    pub agent_id: AgentId,
    pub event_type: EventType,
    pub detail: EventDetail,
    pub score_change: f64,
    pub previous_score: f64,
    pub new_score: f64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl ReputationEvent {
    pub fn new(
        agent_id: AgentId,
        detail: EventDetail,
        score_change: f64,
        previous_score: f64,
        new_score: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            agent_id,
            event_type: detail.event_type(),
            detail,
            score_change,
            previous_score,
            new_score,
            reason: reason.into(),
            created_at: Utc::now(),
        }
    }

    /// The delta actually applied, after clamping.
    pub fn effective_change(&self) -> f64 {
        self.new_score - self.previous_score
    }

    pub fn is_positive(&self) -> bool {
        self.score_change > 0.0
    }

    pub fn is_negative(&self) -> bool {
        self.score_change < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event(score_change: f64, previous: f64, new: f64) -> ReputationEvent {
        ReputationEvent::new(
            AgentId::new("agent-1"),
            EventDetail::Completion {
                bounty_id: "bounty-9".to_string(),
                seconds: Some(3600.0),
            },
            score_change,
            previous,
            new,
            "Bounty completed successfully",
        )
    }

    #[test]
    fn test_event_type_round_trip() {
        let types = [
            EventType::Review,
            EventType::Completion,
            EventType::Failure,
            EventType::DisputeWon,
            EventType::DisputeLost,
            EventType::Response,
            EventType::Adjustment,
        ];
        for event_type in types {
            let parsed: EventType = event_type.to_string().parse().unwrap();
            assert_eq!(parsed, event_type);
        }
        assert!("promotion".parse::<EventType>().is_err());
    }

    #[test]
    fn test_detail_discriminant() {
        let won = EventDetail::Dispute {
            dispute_id: "d-1".to_string(),
            won: true,
        };
        let lost = EventDetail::Dispute {
            dispute_id: "d-2".to_string(),
            won: false,
        };
        assert_eq!(won.event_type(), EventType::DisputeWon);
        assert_eq!(lost.event_type(), EventType::DisputeLost);
        assert_eq!(won.related_id(), Some("d-1"));
        assert_eq!(EventDetail::Adjustment.related_id(), None);
    }

    #[test]
    fn test_effective_change_reflects_clamp() {
        // Intended +10 from 95 clamps at 100: effective change is +5.
        let event = make_event(10.0, 95.0, 100.0);
        assert_eq!(event.score_change, 10.0);
        assert_eq!(event.effective_change(), 5.0);
        assert!(event.is_positive());
        assert!(!event.is_negative());
    }

    #[test]
    fn test_event_serde_round_trip() {
        let event = make_event(5.0, 50.0, 55.0);
        let json = serde_json::to_string(&event).unwrap();
        let back: ReputationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.event_type, EventType::Completion);
    }
}
