use agora_types::{AgentId, AgoraError, ReputationEvent, ReputationRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<StorageError> for AgoraError {
    fn from(e: StorageError) -> Self {
        AgoraError::Storage(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Trait for reputation storage backend implementations.
///
/// Events are append-only; `get_events` must return them in ascending
/// `created_at` (append) order, which is what recomputation replays.
#[async_trait]
pub trait ReputationStore: Send + Sync {
    /// Upsert an agent's aggregate record.
    async fn put_record(&self, record: &ReputationRecord) -> Result<()>;

    /// Fetch an agent's aggregate record.
    async fn get_record(&self, agent_id: &AgentId) -> Result<Option<ReputationRecord>>;

    /// All aggregate records, unordered.
    async fn list_records(&self) -> Result<Vec<ReputationRecord>>;

    /// Append one immutable event to an agent's log.
    async fn append_event(&self, event: &ReputationEvent) -> Result<()>;

    /// An agent's full event log, oldest first.
    async fn get_events(&self, agent_id: &AgentId) -> Result<Vec<ReputationEvent>>;

    /// Number of events logged for an agent.
    async fn count_events(&self, agent_id: &AgentId) -> Result<usize>;

    /// Flush any pending writes.
    async fn flush(&self) -> Result<()>;

    /// Get storage statistics.
    async fn get_stats(&self) -> Result<StorageStats>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageStats {
    pub record_count: usize,
    pub event_count: usize,
    pub total_size_bytes: Option<u64>,
}
