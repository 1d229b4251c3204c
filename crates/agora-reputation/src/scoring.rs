//! Scoring constants and sub-score formulas.
//!
//! Every formula is bounded to [0,100] and moves monotonically with the
//! counters it derives from.

use agora_types::{clamp_score, AgoraError, Result, NEUTRAL_SCORE};

/// Delta for a successfully completed bounty.
pub const COMPLETION_DELTA: f64 = 5.0;
/// Delta for a failed bounty.
pub const FAILURE_DELTA: f64 = -5.0;
/// Delta for a dispute resolved in the agent's favor.
pub const DISPUTE_WON_DELTA: f64 = 2.0;
/// Delta for a dispute resolved against the agent.
pub const DISPUTE_LOST_DELTA: f64 = -4.0;

/// Completion-time baseline for the speed sub-score: 24 hours.
pub const COMPLETION_BASELINE_SECS: f64 = 86_400.0;
/// Response-time baseline for the communication sub-score: 1 hour.
pub const RESPONSE_BASELINE_SECS: f64 = 3_600.0;

/// Star rating to score delta: 5 -> +3, 4 -> +2, 3 -> 0, 2 -> -2, 1 -> -3.
pub fn review_delta(rating: u8) -> Result<f64> {
    match rating {
        5 => Ok(3.0),
        4 => Ok(2.0),
        3 => Ok(0.0),
        2 => Ok(-2.0),
        1 => Ok(-3.0),
        _ => Err(AgoraError::InvalidParameter(format!(
            "review rating must be 1-5, got {}",
            rating
        ))),
    }
}

/// Human-readable reason for a review event.
pub fn review_reason(rating: u8) -> String {
    match rating {
        4 | 5 => format!("positive review ({}/5)", rating),
        3 => "neutral review (3/5)".to_string(),
        _ => format!("negative review ({}/5)", rating),
    }
}

/// Completion ratio scaled to [0,100]; neutral when no terminal outcomes.
pub fn reliability_score(completed: u64, failed: u64) -> f64 {
    let total = completed + failed;
    if total == 0 {
        return NEUTRAL_SCORE;
    }
    clamp_score(100.0 * completed as f64 / total as f64)
}

/// Review sentiment scaled to [0,100]: positives count full, neutrals half;
/// neutral when no reviews.
pub fn quality_score(positive: u64, neutral: u64, total: u64) -> f64 {
    if total == 0 {
        return NEUTRAL_SCORE;
    }
    clamp_score((100.0 * positive as f64 + 50.0 * neutral as f64) / total as f64)
}

/// Saturating baseline curve `100 * B / (B + avg)`: 100 as the average
/// approaches zero, 50 at the baseline, decaying toward 0 beyond it.
/// Neutral when no samples exist.
pub fn pace_score(avg_secs: Option<f64>, baseline_secs: f64) -> f64 {
    match avg_secs {
        None => NEUTRAL_SCORE,
        Some(avg) => clamp_score(100.0 * baseline_secs / (baseline_secs + avg.max(0.0))),
    }
}
