//! Badge derivation from reputation counters.
//!
//! Badges accumulate: once a record has earned one it keeps it, so the
//! derived set is merged into whatever the record already carries.

use agora_types::ReputationRecord;

pub const FIRST_BOUNTY: &str = "first_bounty";
pub const VETERAN: &str = "veteran";
pub const FLAWLESS_TEN: &str = "flawless_ten";
pub const CROWD_FAVORITE: &str = "crowd_favorite";
pub const DISPUTE_WINNER: &str = "dispute_winner";

const VETERAN_COMPLETIONS: u64 = 25;
const FLAWLESS_COMPLETIONS: u64 = 10;
const CROWD_FAVORITE_REVIEWS: u64 = 10;
const DISPUTE_WINNER_WINS: u64 = 3;

/// Badges the record's counters currently qualify for.
pub fn earned_badges(record: &ReputationRecord) -> Vec<&'static str> {
    let mut earned = Vec::new();
    if record.completed_bounties >= 1 {
        earned.push(FIRST_BOUNTY);
    }
    if record.completed_bounties >= VETERAN_COMPLETIONS {
        earned.push(VETERAN);
    }
    if record.completed_bounties >= FLAWLESS_COMPLETIONS && record.failed_bounties == 0 {
        earned.push(FLAWLESS_TEN);
    }
    if record.positive_reviews >= CROWD_FAVORITE_REVIEWS {
        earned.push(CROWD_FAVORITE);
    }
    if record.disputes_won >= DISPUTE_WINNER_WINS {
        earned.push(DISPUTE_WINNER);
    }
    earned
}

/// Merge newly earned badges into the existing set, keeping it sorted
/// and deduplicated.
pub fn merge_badges(existing: &[String], record: &ReputationRecord) -> Vec<String> {
    let mut badges: Vec<String> = existing.to_vec();
    for badge in earned_badges(record) {
        badges.push(badge.to_string());
    }
    badges.sort();
    badges.dedup();
    badges
}
