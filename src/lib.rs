//! Eternal Quest
//!
//! Personal goal tracking: goals of different kinds earn points when events
//! are recorded against them, points accumulate into a score, and the score
//! decides the player's level. Progress is saved as JSON and restored with
//! each goal's kind intact.

pub mod config;
pub mod error;
pub mod goal;
pub mod persistence;
pub mod shell;

pub use config::QuestConfig;
pub use error::{QuestError, RecordPosition, Result};
pub use goal::{Goal, GoalKind, GoalKindTag, QuestLedger};
pub use persistence::{JsonFileStore, ProgressStore, SaveFormat};
pub use shell::Shell;
