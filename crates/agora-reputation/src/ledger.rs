use crate::{badges, scoring};
use agora_storage::StorageEngine;
use agora_types::{
    clamp_score, AgentId, EventDetail, ReputationEvent, ReputationRecord, Result, Tier,
    NEUTRAL_SCORE,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Append-only reputation ledger over shared storage.
///
/// Every scoring action appends an immutable event and then recomputes the
/// agent's aggregate record from the full log, so the stored aggregate never
/// drifts from the event history. A per-agent mutex serializes the
/// append-then-recompute pair; recomputation from the log remains the
/// recovery path if a record is ever lost or corrupted.
pub struct ReputationLedger {
    storage: Arc<StorageEngine>,
    agent_locks: RwLock<HashMap<AgentId, Arc<Mutex<()>>>>,
}

impl ReputationLedger {
    pub fn new(storage: Arc<StorageEngine>) -> Self {
        Self {
            storage,
            agent_locks: RwLock::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, agent_id: &AgentId) -> Arc<Mutex<()>> {
        {
            let locks = self.agent_locks.read().await;
            if let Some(lock) = locks.get(agent_id) {
                return lock.clone();
            }
        }
        let mut locks = self.agent_locks.write().await;
        locks
            .entry(agent_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Create a neutral record for an agent if none exists.
    ///
    /// Idempotent: an existing record is returned unchanged.
    pub async fn initialize_reputation(&self, agent_id: &AgentId) -> Result<ReputationRecord> {
        if let Some(existing) = self.storage.get_record(agent_id).await? {
            return Ok(existing);
        }

        let record = ReputationRecord::new(agent_id.clone());
        self.storage.put_record(&record).await?;
        info!(agent_id = %agent_id, "initialized reputation record");
        Ok(record)
    }

    /// Append a scoring event and recompute the agent's aggregate.
    ///
    /// Returns the created event; `score_change` is the intended pre-clamp
    /// delta, `new_score` the clamped result.
    pub async fn record_event(
        &self,
        agent_id: &AgentId,
        detail: EventDetail,
        score_change: f64,
        reason: impl Into<String>,
    ) -> Result<ReputationEvent> {
        let lock = self.lock_for(agent_id).await;
        let _guard = lock.lock().await;

        let record = self.initialize_reputation(agent_id).await?;
        let previous_score = record.overall_score;
        let new_score = clamp_score(previous_score + score_change);

        let event = ReputationEvent::new(
            agent_id.clone(),
            detail,
            score_change,
            previous_score,
            new_score,
            reason,
        );
        self.storage.append_event(&event).await?;
        debug!(
            agent_id = %agent_id,
            event_type = %event.event_type,
            score_change,
            new_score,
            "recorded reputation event"
        );

        self.recalculate_locked(agent_id).await?;
        Ok(event)
    }

    /// Record a 1-5 star review.
    pub async fn process_review(
        &self,
        agent_id: &AgentId,
        rating: u8,
        review_id: &str,
    ) -> Result<()> {
        let delta = scoring::review_delta(rating)?;
        let reason = scoring::review_reason(rating);
        self.record_event(
            agent_id,
            EventDetail::Review {
                review_id: review_id.to_string(),
                rating,
            },
            delta,
            reason,
        )
        .await?;
        Ok(())
    }

    /// Record a terminal bounty outcome.
    pub async fn process_bounty_completion(
        &self,
        agent_id: &AgentId,
        bounty_id: &str,
        success: bool,
        completion_secs: Option<f64>,
    ) -> Result<()> {
        if success {
            self.record_event(
                agent_id,
                EventDetail::Completion {
                    bounty_id: bounty_id.to_string(),
                    seconds: completion_secs,
                },
                scoring::COMPLETION_DELTA,
                "Bounty completed successfully",
            )
            .await?;
        } else {
            self.record_event(
                agent_id,
                EventDetail::Failure {
                    bounty_id: bounty_id.to_string(),
                },
                scoring::FAILURE_DELTA,
                "Bounty failed",
            )
            .await?;
        }
        Ok(())
    }

    /// Record a resolved dispute.
    pub async fn process_dispute(
        &self,
        agent_id: &AgentId,
        dispute_id: &str,
        won: bool,
    ) -> Result<()> {
        let (delta, reason) = if won {
            (scoring::DISPUTE_WON_DELTA, "Dispute resolved in favor")
        } else {
            (scoring::DISPUTE_LOST_DELTA, "Dispute resolved against")
        };
        self.record_event(
            agent_id,
            EventDetail::Dispute {
                dispute_id: dispute_id.to_string(),
                won,
            },
            delta,
            reason,
        )
        .await?;
        Ok(())
    }

    /// Record a response-time sample. Carries no score delta; feeds the
    /// running response average and the communication sub-score.
    pub async fn process_response_time(
        &self,
        agent_id: &AgentId,
        submission_id: &str,
        seconds: f64,
    ) -> Result<()> {
        if seconds < 0.0 {
            return Err(agora_types::AgoraError::InvalidParameter(format!(
                "response time must be non-negative, got {}",
                seconds
            )));
        }
        self.record_event(
            agent_id,
            EventDetail::Response {
                submission_id: submission_id.to_string(),
                seconds,
            },
            0.0,
            "response time recorded",
        )
        .await?;
        Ok(())
    }

    /// Authoritative recomputation: replay the full event log and upsert
    /// the derived aggregate.
    pub async fn recalculate_reputation(&self, agent_id: &AgentId) -> Result<ReputationRecord> {
        let lock = self.lock_for(agent_id).await;
        let _guard = lock.lock().await;
        self.recalculate_locked(agent_id).await
    }

    /// Recompute while the agent's lock is held.
    async fn recalculate_locked(&self, agent_id: &AgentId) -> Result<ReputationRecord> {
        let events = self.storage.get_events(agent_id).await?;
        let existing = self.storage.get_record(agent_id).await?;

        if events.is_empty() && existing.is_none() {
            let record = ReputationRecord::new(agent_id.clone());
            self.storage.put_record(&record).await?;
            info!(agent_id = %agent_id, "initialized reputation record");
            return Ok(record);
        }

        let mut record = existing.unwrap_or_else(|| ReputationRecord::new(agent_id.clone()));

        let mut overall = NEUTRAL_SCORE;
        let mut completed = 0u64;
        let mut failed = 0u64;
        let mut total_reviews = 0u64;
        let mut positive = 0u64;
        let mut neutral = 0u64;
        let mut negative = 0u64;
        let mut disputes_won = 0u64;
        let mut disputes_lost = 0u64;
        let mut completion_sum = 0.0;
        let mut completion_samples = 0u64;
        let mut response_sum = 0.0;
        let mut response_samples = 0u64;

        for event in &events {
            // Clamp after every step, matching the incremental path
            overall = clamp_score(overall + event.score_change);

            match &event.detail {
                EventDetail::Review { rating, .. } => {
                    total_reviews += 1;
                    match rating {
                        4 | 5 => positive += 1,
                        3 => neutral += 1,
                        _ => negative += 1,
                    }
                }
                EventDetail::Completion { seconds, .. } => {
                    completed += 1;
                    if let Some(secs) = seconds {
                        completion_sum += secs;
                        completion_samples += 1;
                    }
                }
                EventDetail::Failure { .. } => failed += 1,
                EventDetail::Dispute { won: true, .. } => disputes_won += 1,
                EventDetail::Dispute { won: false, .. } => disputes_lost += 1,
                EventDetail::Response { seconds, .. } => {
                    response_sum += seconds;
                    response_samples += 1;
                }
                EventDetail::Adjustment => {}
            }
        }

        record.overall_score = overall;
        record.completed_bounties = completed;
        record.failed_bounties = failed;
        record.total_reviews = total_reviews;
        record.positive_reviews = positive;
        record.neutral_reviews = neutral;
        record.negative_reviews = negative;
        record.disputes_won = disputes_won;
        record.disputes_lost = disputes_lost;
        record.avg_completion_secs =
            (completion_samples > 0).then(|| completion_sum / completion_samples as f64);
        record.avg_response_secs =
            (response_samples > 0).then(|| response_sum / response_samples as f64);

        record.reliability_score = scoring::reliability_score(completed, failed);
        record.quality_score = scoring::quality_score(positive, neutral, total_reviews);
        record.speed_score = scoring::pace_score(
            record.avg_completion_secs,
            scoring::COMPLETION_BASELINE_SECS,
        );
        record.communication_score = scoring::pace_score(
            record.avg_response_secs,
            scoring::RESPONSE_BASELINE_SECS,
        );
        record.tier = Tier::for_score(record.overall_score);
        let earned = badges::merge_badges(&record.badges, &record);
        record.badges = earned;
        record.updated_at = Utc::now();

        self.storage.put_record(&record).await?;
        Ok(record)
    }

    /// Direct lookup, no recomputation.
    pub async fn get_reputation(&self, agent_id: &AgentId) -> Result<Option<ReputationRecord>> {
        Ok(self.storage.get_record(agent_id).await?)
    }

    /// An agent's scoring history, most recent first.
    pub async fn get_reputation_history(
        &self,
        agent_id: &AgentId,
        limit: usize,
    ) -> Result<Vec<ReputationEvent>> {
        let mut events = self.storage.get_events(agent_id).await?;
        events.reverse();
        events.truncate(limit);
        Ok(events)
    }

    /// Top records by overall score, descending.
    pub async fn get_leaderboard(&self, limit: usize) -> Result<Vec<ReputationRecord>> {
        let mut records = self.storage.list_records().await?;
        records.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));
        records.truncate(limit);
        Ok(records)
    }

    /// All records in a tier, best first.
    pub async fn get_agents_by_tier(&self, tier: Tier) -> Result<Vec<ReputationRecord>> {
        let mut records: Vec<ReputationRecord> = self
            .storage
            .list_records()
            .await?
            .into_iter()
            .filter(|record| record.tier == tier)
            .collect();
        records.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_storage::{BackendType, StorageConfig};
    use agora_types::AgoraError;

    fn test_ledger() -> ReputationLedger {
        let engine = StorageEngine::new(StorageConfig {
            backend_type: BackendType::Memory,
        })
        .unwrap();
        ReputationLedger::new(Arc::new(engine))
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let ledger = test_ledger();
        let agent_id = AgentId::new("agent-1");

        let first = ledger.initialize_reputation(&agent_id).await.unwrap();
        assert_eq!(first.overall_score, 50.0);
        assert_eq!(first.tier, Tier::Bronze);

        // Mutate, then re-initialize: the record must come back unchanged
        ledger
            .process_bounty_completion(&agent_id, "bounty-1", true, None)
            .await
            .unwrap();
        let second = ledger.initialize_reputation(&agent_id).await.unwrap();
        assert_eq!(second.overall_score, 55.0);
        assert_eq!(second.completed_bounties, 1);

        let leaderboard = ledger.get_leaderboard(10).await.unwrap();
        assert_eq!(leaderboard.len(), 1);
    }

    #[tokio::test]
    async fn test_score_clamps_at_both_bounds() {
        let ledger = test_ledger();
        let agent_id = AgentId::new("agent-1");

        let event = ledger
            .record_event(&agent_id, EventDetail::Adjustment, 1000.0, "stress")
            .await
            .unwrap();
        assert_eq!(event.previous_score, 50.0);
        assert_eq!(event.new_score, 100.0);
        assert_eq!(event.score_change, 1000.0);
        assert_eq!(event.effective_change(), 50.0);

        let record = ledger.get_reputation(&agent_id).await.unwrap().unwrap();
        assert_eq!(record.overall_score, 100.0);
        assert_eq!(record.tier, Tier::Diamond);

        let event = ledger
            .record_event(&agent_id, EventDetail::Adjustment, -1000.0, "stress")
            .await
            .unwrap();
        assert_eq!(event.new_score, 0.0);

        let record = ledger.get_reputation(&agent_id).await.unwrap().unwrap();
        assert_eq!(record.overall_score, 0.0);
        assert_eq!(record.tier, Tier::Bronze);
    }

    #[tokio::test]
    async fn test_review_mapping_and_counters() {
        let ledger = test_ledger();
        let agent_id = AgentId::new("agent-1");

        ledger.process_review(&agent_id, 5, "review-1").await.unwrap();
        ledger.process_review(&agent_id, 3, "review-2").await.unwrap();
        ledger.process_review(&agent_id, 1, "review-3").await.unwrap();

        let record = ledger.get_reputation(&agent_id).await.unwrap().unwrap();
        // 50 + 3 + 0 - 3
        assert_eq!(record.overall_score, 50.0);
        assert_eq!(record.total_reviews, 3);
        assert_eq!(record.positive_reviews, 1);
        assert_eq!(record.neutral_reviews, 1);
        assert_eq!(record.negative_reviews, 1);

        let history = ledger
            .get_reputation_history(&agent_id, DEFAULT_HISTORY_LIMIT)
            .await
            .unwrap();
        assert_eq!(history.len(), 3);
        // Most recent first
        assert_eq!(history[0].reason, "negative review (1/5)");
        assert_eq!(history[2].reason, "positive review (5/5)");
        assert_eq!(history[1].score_change, 0.0);
    }

    #[tokio::test]
    async fn test_invalid_rating_is_rejected() {
        let ledger = test_ledger();
        let agent_id = AgentId::new("agent-1");

        let err = ledger.process_review(&agent_id, 6, "review-1").await;
        assert!(matches!(err, Err(AgoraError::InvalidParameter(_))));

        // Nothing was recorded
        assert!(ledger.get_reputation(&agent_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_five_completions_reach_gold() {
        let ledger = test_ledger();
        let agent_id = AgentId::new("agent-1");

        for i in 0..5 {
            ledger
                .process_bounty_completion(&agent_id, &format!("bounty-{}", i), true, Some(1800.0))
                .await
                .unwrap();
        }

        let record = ledger.get_reputation(&agent_id).await.unwrap().unwrap();
        assert_eq!(record.overall_score, 75.0);
        assert_eq!(record.tier, Tier::Gold);
        assert_eq!(record.completed_bounties, 5);
        assert_eq!(record.failed_bounties, 0);
        assert_eq!(record.avg_completion_secs, Some(1800.0));
        assert_eq!(record.reliability_score, 100.0);
        assert!(record.badges.contains(&"first_bounty".to_string()));
    }

    #[tokio::test]
    async fn test_negative_review_at_high_score_does_not_overclamp() {
        let ledger = test_ledger();
        let agent_id = AgentId::new("agent-1");

        ledger
            .record_event(&agent_id, EventDetail::Adjustment, 45.0, "migration")
            .await
            .unwrap();
        let record = ledger.get_reputation(&agent_id).await.unwrap().unwrap();
        assert_eq!(record.overall_score, 95.0);
        assert_eq!(record.tier, Tier::Diamond);

        ledger.process_review(&agent_id, 1, "review-1").await.unwrap();
        let record = ledger.get_reputation(&agent_id).await.unwrap().unwrap();
        assert_eq!(record.overall_score, 92.0);
        assert_eq!(record.tier, Tier::Diamond);
    }

    #[tokio::test]
    async fn test_failure_and_dispute_counters() {
        let ledger = test_ledger();
        let agent_id = AgentId::new("agent-1");

        ledger
            .process_bounty_completion(&agent_id, "bounty-1", false, None)
            .await
            .unwrap();
        ledger.process_dispute(&agent_id, "dispute-1", true).await.unwrap();
        ledger.process_dispute(&agent_id, "dispute-2", false).await.unwrap();

        let record = ledger.get_reputation(&agent_id).await.unwrap().unwrap();
        // 50 - 5 + 2 - 4
        assert_eq!(record.overall_score, 43.0);
        assert_eq!(record.failed_bounties, 1);
        assert_eq!(record.disputes_won, 1);
        assert_eq!(record.disputes_lost, 1);
        assert_eq!(record.reliability_score, 0.0);
    }

    #[tokio::test]
    async fn test_response_time_feeds_communication() {
        let ledger = test_ledger();
        let agent_id = AgentId::new("agent-1");

        ledger
            .process_response_time(&agent_id, "submission-1", 1800.0)
            .await
            .unwrap();
        ledger
            .process_response_time(&agent_id, "submission-2", 5400.0)
            .await
            .unwrap();

        let record = ledger.get_reputation(&agent_id).await.unwrap().unwrap();
        // Zero-delta events leave the overall score alone
        assert_eq!(record.overall_score, 50.0);
        assert_eq!(record.avg_response_secs, Some(3600.0));
        // Average sits exactly at the baseline
        assert_eq!(record.communication_score, 50.0);

        assert!(ledger
            .process_response_time(&agent_id, "submission-3", -1.0)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_replay_equivalence() {
        let ledger = test_ledger();
        let agent_id = AgentId::new("agent-1");

        ledger
            .process_bounty_completion(&agent_id, "bounty-1", true, Some(600.0))
            .await
            .unwrap();
        ledger.process_review(&agent_id, 4, "review-1").await.unwrap();
        ledger.process_dispute(&agent_id, "dispute-1", false).await.unwrap();
        ledger
            .process_bounty_completion(&agent_id, "bounty-2", false, None)
            .await
            .unwrap();

        let incremental = ledger.get_reputation(&agent_id).await.unwrap().unwrap();
        let replayed = ledger.recalculate_reputation(&agent_id).await.unwrap();

        assert_eq!(replayed.overall_score, incremental.overall_score);
        assert_eq!(replayed.tier, incremental.tier);
        assert_eq!(replayed.completed_bounties, incremental.completed_bounties);
        assert_eq!(replayed.failed_bounties, incremental.failed_bounties);
        assert_eq!(replayed.total_reviews, incremental.total_reviews);
        assert_eq!(replayed.avg_completion_secs, incremental.avg_completion_secs);
    }

    #[tokio::test]
    async fn test_recalculate_initializes_missing_agent() {
        let ledger = test_ledger();
        let agent_id = AgentId::new("agent-unseen");

        let record = ledger.recalculate_reputation(&agent_id).await.unwrap();
        assert_eq!(record.overall_score, 50.0);
        assert_eq!(record.tier, Tier::Bronze);
        assert!(ledger.get_reputation(&agent_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_history_limit() {
        let ledger = test_ledger();
        let agent_id = AgentId::new("agent-1");

        for i in 0..10 {
            ledger
                .record_event(&agent_id, EventDetail::Adjustment, i as f64, "tick")
                .await
                .unwrap();
        }

        let history = ledger.get_reputation_history(&agent_id, 4).await.unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].score_change, 9.0);
        assert_eq!(history[3].score_change, 6.0);
    }

    #[tokio::test]
    async fn test_leaderboard_and_tier_queries() {
        let ledger = test_ledger();

        for (name, delta) in [("low", -10.0), ("mid", 25.0), ("high", 45.0)] {
            let agent_id = AgentId::new(name);
            ledger
                .record_event(&agent_id, EventDetail::Adjustment, delta, "seed")
                .await
                .unwrap();
        }

        let leaderboard = ledger.get_leaderboard(2).await.unwrap();
        assert_eq!(leaderboard.len(), 2);
        assert_eq!(leaderboard[0].agent_id, AgentId::new("high"));
        assert_eq!(leaderboard[1].agent_id, AgentId::new("mid"));

        let gold = ledger.get_agents_by_tier(Tier::Gold).await.unwrap();
        assert_eq!(gold.len(), 1);
        assert_eq!(gold[0].agent_id, AgentId::new("mid"));

        let diamond = ledger.get_agents_by_tier(Tier::Diamond).await.unwrap();
        assert_eq!(diamond.len(), 1);
        assert_eq!(diamond[0].agent_id, AgentId::new("high"));

        assert!(ledger
            .get_agents_by_tier(Tier::Silver)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_events_converge() {
        let ledger = Arc::new(test_ledger());
        let agent_id = AgentId::new("agent-1");

        let mut handles = vec![];
        for i in 0..10 {
            let ledger = ledger.clone();
            let agent_id = agent_id.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .process_bounty_completion(&agent_id, &format!("bounty-{}", i), true, None)
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let record = ledger.get_reputation(&agent_id).await.unwrap().unwrap();
        assert_eq!(record.completed_bounties, 10);
        // 50 + 10 * 5, clamped at 100
        assert_eq!(record.overall_score, 100.0);
        assert_eq!(record.tier, Tier::Diamond);
    }
}
