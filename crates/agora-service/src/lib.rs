pub mod config;
pub mod logging;

use agora_cache::{DerivedCache, MemoryKv};
use agora_reputation::ReputationLedger;
use agora_storage::StorageEngine;
use agora_types::AgentId;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub use config::ServiceConfig;
pub use logging::init_logging;

/// How many leaderboard rows the warm pass primes.
pub const WARM_LEADERBOARD_LIMIT: usize = 10;

/// Composition root for the reputation core.
///
/// Owns the ledger and the derived cache over shared storage, and applies
/// the invalidate-after-mutation discipline: every operation that changes
/// an agent's standing purges the cached views derived from it.
pub struct MarketplaceCore {
    pub ledger: ReputationLedger,
    pub cache: DerivedCache,
    storage: Arc<StorageEngine>,
}

impl MarketplaceCore {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let storage = Arc::new(StorageEngine::new(config.storage_config()?)?);
        let ledger = ReputationLedger::new(storage.clone());
        let cache = if config.cache.enabled {
            DerivedCache::new(Arc::new(MemoryKv::new()))
        } else {
            DerivedCache::disabled()
        };

        info!(
            backend = %config.storage.backend,
            cache_enabled = config.cache.enabled,
            "marketplace core ready"
        );

        Ok(Self {
            ledger,
            cache,
            storage,
        })
    }

    /// Prime the hottest derived views from persistent storage so the first
    /// readers after startup hit warm entries.
    pub async fn warm(&self) -> Result<()> {
        let leaderboard = self
            .cache
            .leaderboard(|| async {
                self.ledger.get_leaderboard(WARM_LEADERBOARD_LIMIT).await
            })
            .await?;
        let _ = self
            .cache
            .platform_stats(|| async { Ok(self.storage.get_stats().await?) })
            .await?;

        info!(leaderboard_entries = leaderboard.len(), "cache warmed");
        Ok(())
    }

    /// Flush storage and clear the cache namespace.
    pub async fn shutdown(&self) -> Result<()> {
        self.cache.invalidate_all().await;
        self.storage.flush().await?;
        info!("marketplace core shut down");
        Ok(())
    }

    /// Record a terminal bounty outcome and purge the views it invalidates.
    pub async fn complete_bounty(
        &self,
        agent_id: &AgentId,
        bounty_id: &str,
        success: bool,
        completion_secs: Option<f64>,
    ) -> Result<()> {
        self.ledger
            .process_bounty_completion(agent_id, bounty_id, success, completion_secs)
            .await?;
        self.cache.invalidate_agent(agent_id.as_str()).await;
        self.cache.invalidate_bounty(bounty_id).await;
        Ok(())
    }

    /// Record a review and purge the agent's cached views.
    pub async fn submit_review(
        &self,
        agent_id: &AgentId,
        rating: u8,
        review_id: &str,
    ) -> Result<()> {
        self.ledger.process_review(agent_id, rating, review_id).await?;
        self.cache.invalidate_agent(agent_id.as_str()).await;
        Ok(())
    }

    /// Record a dispute resolution and purge the agent's cached views.
    pub async fn resolve_dispute(
        &self,
        agent_id: &AgentId,
        dispute_id: &str,
        won: bool,
    ) -> Result<()> {
        self.ledger.process_dispute(agent_id, dispute_id, won).await?;
        self.cache.invalidate_agent(agent_id.as_str()).await;
        Ok(())
    }

    /// Record a response-time sample and purge the agent's cached views.
    pub async fn record_response(
        &self,
        agent_id: &AgentId,
        submission_id: &str,
        seconds: f64,
    ) -> Result<()> {
        self.ledger
            .process_response_time(agent_id, submission_id, seconds)
            .await?;
        self.cache.invalidate_agent(agent_id.as_str()).await;
        Ok(())
    }
}
