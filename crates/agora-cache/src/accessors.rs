//! Domain accessors: thin wrappers pinning the key shape, TTL, and tag set
//! for each derived view.

use crate::cache::DerivedCache;
use agora_types::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

pub const BOUNTY_LIST_TTL: Duration = Duration::from_secs(300);
pub const BOUNTY_TTL: Duration = Duration::from_secs(600);
pub const AGENT_TTL: Duration = Duration::from_secs(600);
pub const TOP_AGENTS_TTL: Duration = Duration::from_secs(300);
pub const LEADERBOARD_TTL: Duration = Duration::from_secs(60);
pub const STATS_TTL: Duration = Duration::from_secs(120);
pub const ACTIVITY_TTL: Duration = Duration::from_secs(60);
pub const AGENT_UPLOADS_TTL: Duration = Duration::from_secs(300);

/// Analytics views, keyed per variant; the deeper reports cache longer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsKind {
    Basic,
    Advanced,
    Roi,
    Benchmarks,
}

impl AnalyticsKind {
    pub fn key(&self) -> &'static str {
        match self {
            AnalyticsKind::Basic => "analytics:basic",
            AnalyticsKind::Advanced => "analytics:advanced",
            AnalyticsKind::Roi => "analytics:roi",
            AnalyticsKind::Benchmarks => "analytics:benchmarks",
        }
    }

    pub fn ttl(&self) -> Duration {
        match self {
            AnalyticsKind::Basic | AnalyticsKind::Benchmarks => Duration::from_secs(300),
            AnalyticsKind::Advanced | AnalyticsKind::Roi => Duration::from_secs(600),
        }
    }
}

impl DerivedCache {
    pub async fn bounty_list<T, F, Fut>(&self, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.get_or_fetch("bounties:list", BOUNTY_LIST_TTL, &["bounties"], fetcher)
            .await
    }

    pub async fn bounty<T, F, Fut>(&self, bounty_id: &str, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = format!("bounty:{}", bounty_id);
        self.get_or_fetch(&key, BOUNTY_TTL, &["bounty", &key], fetcher)
            .await
    }

    pub async fn agent_profile<T, F, Fut>(&self, agent_id: &str, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = format!("agent:{}", agent_id);
        self.get_or_fetch(&key, AGENT_TTL, &["agent", &key], fetcher)
            .await
    }

    pub async fn top_agents<T, F, Fut>(&self, limit: usize, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = format!("agents:top:{}", limit);
        self.get_or_fetch(&key, TOP_AGENTS_TTL, &["agents", "leaderboard"], fetcher)
            .await
    }

    pub async fn leaderboard<T, F, Fut>(&self, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.get_or_fetch("leaderboard", LEADERBOARD_TTL, &["leaderboard"], fetcher)
            .await
    }

    pub async fn platform_stats<T, F, Fut>(&self, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.get_or_fetch("stats", STATS_TTL, &["stats"], fetcher).await
    }

    pub async fn analytics<T, F, Fut>(&self, kind: AnalyticsKind, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.get_or_fetch(kind.key(), kind.ttl(), &["analytics"], fetcher)
            .await
    }

    pub async fn recent_activity<T, F, Fut>(&self, limit: usize, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = format!("activity:recent:{}", limit);
        self.get_or_fetch(&key, ACTIVITY_TTL, &["activity"], fetcher)
            .await
    }

    pub async fn agent_uploads<T, F, Fut>(&self, filters: Option<&str>, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = match filters {
            Some(filters) => format!("agent-uploads:list:{}", filters),
            None => "agent-uploads:list".to_string(),
        };
        self.get_or_fetch(&key, AGENT_UPLOADS_TTL, &["agent-uploads"], fetcher)
            .await
    }
}
