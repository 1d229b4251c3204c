use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    BackendError(String),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Trait for key-value cache backend implementations.
///
/// Values are opaque JSON strings. Entries carry a TTL and a set of
/// invalidation-group tags; patterns are literal prefixes with a trailing
/// `*` wildcard.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Fetch a live (unexpired) value.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value with its TTL and tags.
    async fn set(&self, key: &str, value: &str, ttl: Duration, tags: &[String]) -> Result<()>;

    /// Delete exact keys; returns how many existed.
    async fn delete(&self, keys: &[String]) -> Result<u64>;

    /// Delete every key matching a `prefix*` pattern (or an exact key when
    /// no wildcard is present); returns how many were removed.
    async fn delete_pattern(&self, pattern: &str) -> Result<u64>;

    /// Delete every entry carrying a tag; returns how many were removed.
    async fn delete_by_tag(&self, tag: &str) -> Result<u64>;

    /// Round-trip health probe.
    async fn ping(&self) -> Result<Duration>;
}
