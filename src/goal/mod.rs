//! Goal Module
//!
//! Goal kinds, the ledger that scores them, and level derivation.

pub mod definition;
pub mod ledger;
pub mod level;

pub use definition::{ChecklistProgress, Goal, GoalKind, GoalKindTag};
pub use ledger::QuestLedger;
pub use level::{level_for_score, score_to_next_level, BASE_LEVEL, LEVEL_THRESHOLDS};
