use crate::backend::KvBackend;
use agora_types::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Namespace prefix applied to every key before it reaches the backend.
pub const CACHE_NAMESPACE: &str = "cache:";

/// Health snapshot of the cache backend.
#[derive(Debug, Clone)]
pub struct CacheHealth {
    pub available: bool,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

/// Tagged read-through cache in front of expensive derived queries.
///
/// Strictly an optimization, never a correctness dependency: with no
/// backend configured every read falls through to the fetcher and every
/// invalidation is a no-op. Backend failures are logged and degrade the
/// same way; only fetcher errors propagate.
pub struct DerivedCache {
    backend: Option<Arc<dyn KvBackend>>,
}

impl DerivedCache {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A cache with no backend: every call degrades to the fetcher.
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    /// Whether a backend is configured. Evaluated per call; there is no
    /// circuit-breaker state.
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    fn namespaced(key: &str) -> String {
        format!("{}{}", CACHE_NAMESPACE, key)
    }

    /// Serve `key` from cache, or compute it with `fetcher` and store the
    /// result under the given TTL and tags.
    ///
    /// Concurrent misses for the same key may compute redundantly; that is
    /// accepted rather than locked against.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        tags: &[&str],
        fetcher: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let backend = match &self.backend {
            Some(backend) => backend,
            None => return fetcher().await,
        };

        let full_key = Self::namespaced(key);
        match backend.get(&full_key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!(key, "cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    warn!(key, error = %e, "cached value failed to decode, refetching");
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(key, error = %e, "cache read failed, falling through to fetcher");
            }
        }

        let value = fetcher().await?;

        match serde_json::to_string(&value) {
            Ok(raw) => {
                let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
                if let Err(e) = backend.set(&full_key, &raw, ttl, &tags).await {
                    warn!(key, error = %e, "cache write failed");
                } else {
                    debug!(key, ttl_secs = ttl.as_secs(), "cache populated");
                }
            }
            Err(e) => {
                warn!(key, error = %e, "value failed to encode for cache");
            }
        }

        Ok(value)
    }

    async fn delete_keys(&self, keys: &[String]) {
        if let Some(backend) = &self.backend {
            let namespaced: Vec<String> = keys.iter().map(|k| Self::namespaced(k)).collect();
            if let Err(e) = backend.delete(&namespaced).await {
                warn!(error = %e, "cache delete failed");
            }
        }
    }

    async fn sweep_prefix(&self, prefix: &str) {
        if let Some(backend) = &self.backend {
            let pattern = format!("{}*", Self::namespaced(prefix));
            if let Err(e) = backend.delete_pattern(&pattern).await {
                warn!(prefix, error = %e, "cache pattern delete failed");
            }
        }
    }

    async fn sweep_tag(&self, tag: &str) {
        if let Some(backend) = &self.backend {
            if let Err(e) = backend.delete_by_tag(tag).await {
                warn!(tag, error = %e, "cache tag delete failed");
            }
        }
    }

    /// Purge views derived from one bounty: the bounty itself, the bounty
    /// list, platform stats, and the analytics family.
    pub async fn invalidate_bounty(&self, bounty_id: &str) {
        self.delete_keys(&[
            "bounties:list".to_string(),
            format!("bounty:{}", bounty_id),
            "stats".to_string(),
        ])
        .await;
        self.sweep_prefix("analytics").await;
    }

    /// Purge views derived from one agent: the profile, the leaderboard,
    /// every top-agents page, and platform stats.
    pub async fn invalidate_agent(&self, agent_id: &str) {
        self.delete_keys(&[
            format!("agent:{}", agent_id),
            "leaderboard".to_string(),
            "stats".to_string(),
        ])
        .await;
        self.sweep_prefix("agents:top:").await;
    }

    /// Purge every leaderboard-tagged entry (the main board and the
    /// top-agents pages).
    pub async fn invalidate_leaderboard(&self) {
        self.sweep_tag("leaderboard").await;
    }

    pub async fn invalidate_stats(&self) {
        self.delete_keys(&["stats".to_string()]).await;
    }

    pub async fn invalidate_analytics(&self) {
        self.sweep_prefix("analytics").await;
    }

    pub async fn invalidate_activity(&self) {
        self.sweep_prefix("activity:").await;
    }

    pub async fn invalidate_agent_uploads(&self) {
        self.sweep_prefix("agent-uploads:").await;
    }

    /// Administrative reset: purge the entire cache namespace.
    pub async fn invalidate_all(&self) {
        if let Some(backend) = &self.backend {
            let pattern = format!("{}*", CACHE_NAMESPACE);
            if let Err(e) = backend.delete_pattern(&pattern).await {
                warn!(error = %e, "cache namespace sweep failed");
            }
        }
    }

    /// Probe the backend.
    pub async fn health_check(&self) -> CacheHealth {
        let backend = match &self.backend {
            Some(backend) => backend,
            None => {
                return CacheHealth {
                    available: false,
                    latency_ms: None,
                    error: Some("cache backend not configured".to_string()),
                }
            }
        };

        match backend.ping().await {
            Ok(latency) => CacheHealth {
                available: true,
                latency_ms: Some(latency.as_millis() as u64),
                error: None,
            },
            Err(e) => CacheHealth {
                available: false,
                latency_ms: None,
                error: Some(e.to_string()),
            },
        }
    }
}
