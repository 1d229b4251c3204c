pub mod backend;
pub mod memory;
pub mod store;

#[cfg(feature = "rocksdb")]
pub mod rocks;

pub use backend::{ReputationStore, StorageError, StorageStats};
pub use memory::MemoryBackend;
pub use store::{BackendType, StorageConfig, StorageEngine};

#[cfg(feature = "rocksdb")]
pub use rocks::RocksBackend;
