pub mod badges;
pub mod ledger;
pub mod scoring;

pub use ledger::{ReputationLedger, DEFAULT_HISTORY_LIMIT};
pub use scoring::{
    COMPLETION_DELTA, DISPUTE_LOST_DELTA, DISPUTE_WON_DELTA, FAILURE_DELTA,
};
