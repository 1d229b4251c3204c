pub mod agent;
pub mod error;
pub mod event;
pub mod record;
pub mod tier;

pub use agent::AgentId;
pub use error::{AgoraError, Result};
pub use event::{EventDetail, EventType, ReputationEvent};
pub use record::{clamp_score, ReputationRecord, NEUTRAL_SCORE, SCORE_CEILING, SCORE_FLOOR};
pub use tier::Tier;
