use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};

use crate::backend::{ReputationStore, Result, StorageError, StorageStats};
use agora_types::{AgentId, ReputationEvent, ReputationRecord};

/// Persistent RocksDB backend.
///
/// Key families: `rec:{agent}` for aggregate records, `evt:{agent}:{seq}`
/// for the append-only event log (seq zero-padded so lexicographic key
/// order is append order), `seq:{agent}` for the next event sequence.
pub struct RocksBackend {
    db: Arc<DB>,
}

impl RocksBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        // Performance tuning
        opts.set_write_buffer_size(64 * 1024 * 1024); // 64MB
        opts.set_max_write_buffer_number(3);
        opts.set_max_background_jobs(4);
        opts.set_level_compaction_dynamic_level_bytes(true);

        let db = DB::open(&opts, path)
            .map_err(|e| StorageError::BackendError(format!("Failed to open RocksDB: {}", e)))?;

        Ok(Self { db: Arc::new(db) })
    }

    pub fn with_options<P: AsRef<Path>>(path: P, opts: Options) -> Result<Self> {
        let db = DB::open(&opts, path)
            .map_err(|e| StorageError::BackendError(format!("Failed to open RocksDB: {}", e)))?;

        Ok(Self { db: Arc::new(db) })
    }

    fn record_key(agent_id: &AgentId) -> Vec<u8> {
        format!("rec:{}", agent_id).into_bytes()
    }

    fn event_key(agent_id: &AgentId, seq: u64) -> Vec<u8> {
        format!("evt:{}:{:016}", agent_id, seq).into_bytes()
    }

    fn seq_key(agent_id: &AgentId) -> Vec<u8> {
        format!("seq:{}", agent_id).into_bytes()
    }

    /// Next unused event sequence number for an agent.
    fn next_seq(&self, agent_id: &AgentId) -> Result<u64> {
        match self.db.get(Self::seq_key(agent_id)) {
            Ok(Some(data)) => {
                let bytes: [u8; 8] = data.as_slice().try_into().map_err(|_| {
                    StorageError::SerializationError("Invalid sequence data".to_string())
                })?;
                Ok(u64::from_le_bytes(bytes))
            }
            Ok(None) => Ok(0),
            Err(e) => Err(StorageError::BackendError(format!(
                "RocksDB get sequence error: {}",
                e
            ))),
        }
    }
}

#[async_trait]
impl ReputationStore for RocksBackend {
    async fn put_record(&self, record: &ReputationRecord) -> Result<()> {
        let key = Self::record_key(&record.agent_id);
        let value = bincode::serialize(record)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        self.db
            .put(key, value)
            .map_err(|e| StorageError::BackendError(format!("RocksDB put error: {}", e)))
    }

    async fn get_record(&self, agent_id: &AgentId) -> Result<Option<ReputationRecord>> {
        let key = Self::record_key(agent_id);

        match self.db.get(key) {
            Ok(Some(data)) => {
                let record = bincode::deserialize(&data)
                    .map_err(|e| StorageError::SerializationError(e.to_string()))?;
                Ok(Some(record))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::BackendError(format!(
                "RocksDB get error: {}",
                e
            ))),
        }
    }

    async fn list_records(&self) -> Result<Vec<ReputationRecord>> {
        let prefix = b"rec:";
        let iter = self
            .db
            .iterator(IteratorMode::From(prefix, Direction::Forward));
        let mut records = Vec::new();

        for item in iter {
            let (key, value) = item
                .map_err(|e| StorageError::BackendError(format!("Iterator error: {}", e)))?;

            if !key.starts_with(prefix) {
                break;
            }

            let record = bincode::deserialize(&value)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?;
            records.push(record);
        }

        Ok(records)
    }

    async fn append_event(&self, event: &ReputationEvent) -> Result<()> {
        let seq = self.next_seq(&event.agent_id)?;
        let value = bincode::serialize(event)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        // Event write and sequence bump land atomically
        let mut batch = WriteBatch::default();
        batch.put(Self::event_key(&event.agent_id, seq), value);
        batch.put(Self::seq_key(&event.agent_id), (seq + 1).to_le_bytes());

        self.db
            .write(batch)
            .map_err(|e| StorageError::BackendError(format!("RocksDB batch write error: {}", e)))
    }

    async fn get_events(&self, agent_id: &AgentId) -> Result<Vec<ReputationEvent>> {
        let prefix = format!("evt:{}:", agent_id).into_bytes();
        let iter = self
            .db
            .iterator(IteratorMode::From(&prefix, Direction::Forward));
        let mut events = Vec::new();

        for item in iter {
            let (key, value) = item
                .map_err(|e| StorageError::BackendError(format!("Iterator error: {}", e)))?;

            if !key.starts_with(&prefix) {
                break;
            }

            let event = bincode::deserialize(&value)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?;
            events.push(event);
        }

        Ok(events)
    }

    async fn count_events(&self, agent_id: &AgentId) -> Result<usize> {
        // The sequence counter is the append count; events are never deleted
        Ok(self.next_seq(agent_id)? as usize)
    }

    async fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| StorageError::BackendError(format!("RocksDB flush error: {}", e)))
    }

    async fn get_stats(&self) -> Result<StorageStats> {
        let record_count = self.list_records().await?.len();

        let prefix = b"evt:";
        let iter = self
            .db
            .iterator(IteratorMode::From(prefix, Direction::Forward));
        let mut event_count = 0;

        for item in iter {
            let (key, _) = item
                .map_err(|e| StorageError::BackendError(format!("Iterator error: {}", e)))?;
            if !key.starts_with(prefix) {
                break;
            }
            event_count += 1;
        }

        Ok(StorageStats {
            record_count,
            event_count,
            total_size_bytes: None, // RocksDB doesn't provide easy size estimation
        })
    }
}
