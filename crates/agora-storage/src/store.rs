use crate::backend::{ReputationStore, Result, StorageStats};
use agora_types::{AgentId, ReputationEvent, ReputationRecord};
use std::sync::Arc;
use tracing::info;

/// Configuration for the storage engine.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend_type: BackendType,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Default to RocksDB for persistence if available
        #[cfg(feature = "rocksdb")]
        let backend_type = BackendType::RocksDB {
            path: std::env::var("AGORA_DATA_DIR").unwrap_or_else(|_| "./data/storage".to_string()),
        };

        #[cfg(not(feature = "rocksdb"))]
        let backend_type = BackendType::Memory;

        Self { backend_type }
    }
}

#[derive(Debug, Clone)]
pub enum BackendType {
    Memory,
    #[cfg(feature = "rocksdb")]
    RocksDB {
        path: String,
    },
}

/// Configured storage engine wrapping a backend implementation.
pub struct StorageEngine {
    backend: Arc<dyn ReputationStore>,
    _config: StorageConfig,
}

impl StorageEngine {
    pub fn new(config: StorageConfig) -> Result<Self> {
        let backend: Arc<dyn ReputationStore> = match &config.backend_type {
            BackendType::Memory => {
                info!("storage engine using memory backend");
                Arc::new(crate::memory::MemoryBackend::new())
            }
            #[cfg(feature = "rocksdb")]
            BackendType::RocksDB { path } => {
                info!(path = %path, "storage engine using rocksdb backend");
                Arc::new(crate::rocks::RocksBackend::new(path)?)
            }
        };

        Ok(Self {
            backend,
            _config: config,
        })
    }

    pub async fn put_record(&self, record: &ReputationRecord) -> Result<()> {
        self.backend.put_record(record).await
    }

    pub async fn get_record(&self, agent_id: &AgentId) -> Result<Option<ReputationRecord>> {
        self.backend.get_record(agent_id).await
    }

    pub async fn list_records(&self) -> Result<Vec<ReputationRecord>> {
        self.backend.list_records().await
    }

    pub async fn append_event(&self, event: &ReputationEvent) -> Result<()> {
        self.backend.append_event(event).await
    }

    pub async fn get_events(&self, agent_id: &AgentId) -> Result<Vec<ReputationEvent>> {
        self.backend.get_events(agent_id).await
    }

    pub async fn count_events(&self, agent_id: &AgentId) -> Result<usize> {
        self.backend.count_events(agent_id).await
    }

    pub async fn flush(&self) -> Result<()> {
        self.backend.flush().await
    }

    pub async fn get_stats(&self) -> Result<StorageStats> {
        self.backend.get_stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::EventDetail;

    #[tokio::test]
    async fn test_engine_with_memory_backend() {
        let engine = StorageEngine::new(StorageConfig {
            backend_type: BackendType::Memory,
        })
        .unwrap();

        let agent_id = AgentId::new("agent-1");
        let record = ReputationRecord::new(agent_id.clone());
        engine.put_record(&record).await.unwrap();

        let event = ReputationEvent::new(
            agent_id.clone(),
            EventDetail::Failure {
                bounty_id: "bounty-3".to_string(),
            },
            -5.0,
            50.0,
            45.0,
            "Bounty failed",
        );
        engine.append_event(&event).await.unwrap();

        assert!(engine.get_record(&agent_id).await.unwrap().is_some());
        assert_eq!(engine.count_events(&agent_id).await.unwrap(), 1);
        assert_eq!(engine.get_events(&agent_id).await.unwrap()[0], event);

        let stats = engine.get_stats().await.unwrap();
        assert_eq!(stats.record_count, 1);
        assert_eq!(stats.event_count, 1);
        engine.flush().await.unwrap();
    }
}
