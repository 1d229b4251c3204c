pub mod accessors;
pub mod backend;
pub mod cache;
pub mod memory;

pub use accessors::AnalyticsKind;
pub use backend::{CacheError, KvBackend};
pub use cache::{CacheHealth, DerivedCache, CACHE_NAMESPACE};
pub use memory::MemoryKv;
