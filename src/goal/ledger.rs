//! Quest Ledger
//!
//! Owns the ordered goal list, the running score and the derived level.

use std::io::{Read, Write};

use tracing::{debug, info};

use super::definition::Goal;
use super::level::{level_for_score, BASE_LEVEL};
use crate::error::Result;
use crate::persistence::{codec, ProgressStore, SaveFormat};

/// All goals and progress for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestLedger {
    goals: Vec<Goal>,
    score: u64,
    level: u32,
}

impl Default for QuestLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestLedger {
    pub fn new() -> Self {
        Self {
            goals: Vec::new(),
            score: 0,
            level: BASE_LEVEL,
        }
    }

    /// Rebuild a ledger from restored parts; the level is re-derived
    pub(crate) fn from_parts(goals: Vec<Goal>, score: u64) -> Self {
        Self {
            goals,
            score,
            level: level_for_score(score),
        }
    }

    /// Append a goal and return its index
    pub fn add_goal(&mut self, goal: Goal) -> usize {
        debug!("Added {} goal '{}'", goal.kind_tag().as_str(), goal.name());
        self.goals.push(goal);
        self.goals.len() - 1
    }

    /// Record an event against the goal at `index`.
    ///
    /// Out-of-range indices (including negative ones) are ignored.
    pub fn record_event<I: TryInto<usize>>(&mut self, index: I) {
        let _ = self.try_record_event(index);
    }

    /// Like [`record_event`](Self::record_event), but returns the points
    /// awarded, or `None` when `index` does not name a goal.
    pub fn try_record_event<I: TryInto<usize>>(&mut self, index: I) -> Option<u32> {
        let index = index.try_into().ok()?;
        let goal = self.goals.get_mut(index)?;

        let points = goal.record_event();
        debug!("Recorded event for '{}': +{} points", goal.name(), points);

        self.score = self.score.saturating_add(u64::from(points));
        let new_level = level_for_score(self.score);
        if new_level > self.level {
            info!("Level up! {} -> {} (score {})", self.level, new_level, self.score);
        }
        self.level = new_level;

        Some(points)
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Goals in insertion order
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get(&self, index: usize) -> Option<&Goal> {
        self.goals.get(index)
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Score line shown to the user
    pub fn summary(&self) -> String {
        format!("Total Score: {}, Level: {}", self.score, self.level)
    }

    /// Serialize the ledger to `writer`
    pub fn save<W: Write>(&self, writer: W, format: SaveFormat) -> Result<()> {
        codec::write_ledger(self, writer, format)
    }

    /// Replace this ledger with one read from `reader`.
    ///
    /// On error the ledger is left untouched.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<()> {
        *self = codec::read_ledger(reader)?;
        Ok(())
    }

    pub fn save_to(&self, store: &dyn ProgressStore, format: SaveFormat) -> Result<()> {
        let contents = codec::encode(self, format)?;
        store.write(&contents)?;
        info!("Saved {} goals (score {})", self.goals.len(), self.score);
        Ok(())
    }

    /// Replace this ledger with the store's saved progress.
    ///
    /// Returns `false` and leaves the ledger as-is when nothing has been
    /// saved yet.
    pub fn load_from(&mut self, store: &dyn ProgressStore) -> Result<bool> {
        let Some(contents) = store.read()? else {
            info!("No saved progress found, keeping current goals");
            return Ok(false);
        };
        *self = codec::decode(&contents)?;
        info!("Loaded {} goals (score {}, level {})", self.goals.len(), self.score, self.level);
        Ok(true)
    }
}
