use crate::backend::{ReputationStore, Result, StorageStats};
use agora_types::{AgentId, ReputationEvent, ReputationRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage backend for testing and development.
pub struct MemoryBackend {
    records: Arc<RwLock<HashMap<AgentId, ReputationRecord>>>,
    events: Arc<RwLock<HashMap<AgentId, Vec<ReputationEvent>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            events: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReputationStore for MemoryBackend {
    async fn put_record(&self, record: &ReputationRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.agent_id.clone(), record.clone());
        Ok(())
    }

    async fn get_record(&self, agent_id: &AgentId) -> Result<Option<ReputationRecord>> {
        let records = self.records.read().await;
        Ok(records.get(agent_id).cloned())
    }

    async fn list_records(&self) -> Result<Vec<ReputationRecord>> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn append_event(&self, event: &ReputationEvent) -> Result<()> {
        let mut events = self.events.write().await;
        events
            .entry(event.agent_id.clone())
            .or_insert_with(Vec::new)
            .push(event.clone());
        Ok(())
    }

    async fn get_events(&self, agent_id: &AgentId) -> Result<Vec<ReputationEvent>> {
        let events = self.events.read().await;
        Ok(events.get(agent_id).cloned().unwrap_or_default())
    }

    async fn count_events(&self, agent_id: &AgentId) -> Result<usize> {
        let events = self.events.read().await;
        Ok(events.get(agent_id).map(|log| log.len()).unwrap_or(0))
    }

    async fn flush(&self) -> Result<()> {
        // No-op for memory backend
        Ok(())
    }

    async fn get_stats(&self) -> Result<StorageStats> {
        let records = self.records.read().await;
        let events = self.events.read().await;

        Ok(StorageStats {
            record_count: records.len(),
            event_count: events.values().map(|log| log.len()).sum(),
            total_size_bytes: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::EventDetail;

    fn make_event(agent_id: &AgentId, delta: f64, previous: f64) -> ReputationEvent {
        ReputationEvent::new(
            agent_id.clone(),
            EventDetail::Adjustment,
            delta,
            previous,
            (previous + delta).clamp(0.0, 100.0),
            "manual adjustment",
        )
    }

    #[tokio::test]
    async fn test_record_upsert() {
        let backend = MemoryBackend::new();
        let agent_id = AgentId::new("agent-1");

        let mut record = ReputationRecord::new(agent_id.clone());
        backend.put_record(&record).await.unwrap();

        record.overall_score = 62.0;
        backend.put_record(&record).await.unwrap();

        let stored = backend.get_record(&agent_id).await.unwrap().unwrap();
        assert_eq!(stored.overall_score, 62.0);
        assert_eq!(backend.list_records().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_record_is_none() {
        let backend = MemoryBackend::new();
        let missing = backend
            .get_record(&AgentId::new("nobody"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_event_log_preserves_order() {
        let backend = MemoryBackend::new();
        let agent_id = AgentId::new("agent-2");

        for i in 0..5 {
            let event = make_event(&agent_id, i as f64, 50.0);
            backend.append_event(&event).await.unwrap();
        }

        let log = backend.get_events(&agent_id).await.unwrap();
        assert_eq!(log.len(), 5);
        for (i, event) in log.iter().enumerate() {
            assert_eq!(event.score_change, i as f64);
        }
        assert_eq!(backend.count_events(&agent_id).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_stats() {
        let backend = MemoryBackend::new();
        let a = AgentId::new("a");
        let b = AgentId::new("b");

        backend
            .put_record(&ReputationRecord::new(a.clone()))
            .await
            .unwrap();
        backend
            .put_record(&ReputationRecord::new(b.clone()))
            .await
            .unwrap();
        backend.append_event(&make_event(&a, 1.0, 50.0)).await.unwrap();
        backend.append_event(&make_event(&b, 2.0, 50.0)).await.unwrap();
        backend.append_event(&make_event(&b, 3.0, 52.0)).await.unwrap();

        let stats = backend.get_stats().await.unwrap();
        assert_eq!(stats.record_count, 2);
        assert_eq!(stats.event_count, 3);
        assert!(stats.total_size_bytes.is_none());
    }
}
