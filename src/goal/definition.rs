//! Goal Definitions
//!
//! The three goal kinds and how each one reacts to a recorded event.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QuestError, Result};

/// Goal kinds supported by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKindTag {
    /// Done after a single event
    Simple,
    /// Never done, every event pays out
    Eternal,
    /// Done after a fixed number of events, with a completion bonus
    Checklist,
}

impl GoalKindTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKindTag::Simple => "simple",
            GoalKindTag::Eternal => "eternal",
            GoalKindTag::Checklist => "checklist",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Some(GoalKindTag::Simple),
            "eternal" => Some(GoalKindTag::Eternal),
            "checklist" => Some(GoalKindTag::Checklist),
            _ => None,
        }
    }
}

/// Counters carried by a checklist goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistProgress {
    pub target_count: u32,
    pub current_count: u32,
    pub bonus_points: u32,
}

impl ChecklistProgress {
    pub fn is_done(&self) -> bool {
        self.current_count >= self.target_count
    }
}

/// Per-kind state of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalKind {
    Simple,
    Eternal,
    Checklist(ChecklistProgress),
}

impl GoalKind {
    pub fn tag(&self) -> GoalKindTag {
        match self {
            GoalKind::Simple => GoalKindTag::Simple,
            GoalKind::Eternal => GoalKindTag::Eternal,
            GoalKind::Checklist(_) => GoalKindTag::Checklist,
        }
    }
}

/// A single tracked goal.
///
/// `completed` only changes through [`Goal::record_event`]; the one other way
/// to set it is restoring a saved record via [`Goal::restore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    name: String,
    points: u32,
    completed: bool,
    kind: GoalKind,
}

impl Goal {
    pub fn simple(name: impl Into<String>, points: u32) -> Result<Self> {
        Self::build(name.into(), points, GoalKind::Simple)
    }

    pub fn eternal(name: impl Into<String>, points: u32) -> Result<Self> {
        Self::build(name.into(), points, GoalKind::Eternal)
    }

    pub fn checklist(
        name: impl Into<String>,
        points: u32,
        target_count: u32,
        bonus_points: u32,
    ) -> Result<Self> {
        if target_count == 0 {
            return Err(QuestError::invalid_goal(
                "checklist target count must be at least 1",
            ));
        }
        Self::build(
            name.into(),
            points,
            GoalKind::Checklist(ChecklistProgress {
                target_count,
                current_count: 0,
                bonus_points,
            }),
        )
    }

    fn build(name: String, points: u32, kind: GoalKind) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(QuestError::invalid_goal("goal name cannot be empty"));
        }
        Ok(Self {
            name,
            points,
            completed: false,
            kind,
        })
    }

    /// Rebuild a goal from saved fields. The caller is responsible for
    /// normalizing `completed` against the kind first.
    pub(crate) fn restore(name: String, points: u32, completed: bool, kind: GoalKind) -> Self {
        Self {
            name,
            points,
            completed,
            kind,
        }
    }

    /// Record one event against this goal and return the points it earns.
    ///
    /// Finished simple and checklist goals award nothing further.
    pub fn record_event(&mut self) -> u32 {
        match &mut self.kind {
            GoalKind::Simple => {
                if self.completed {
                    return 0;
                }
                self.completed = true;
                self.points
            }
            GoalKind::Eternal => self.points,
            GoalKind::Checklist(progress) => {
                if self.completed {
                    return 0;
                }
                progress.current_count = (progress.current_count + 1).min(progress.target_count);
                if progress.is_done() {
                    self.completed = true;
                    self.points.saturating_add(progress.bonus_points)
                } else {
                    self.points
                }
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn kind(&self) -> &GoalKind {
        &self.kind
    }

    pub fn kind_tag(&self) -> GoalKindTag {
        self.kind.tag()
    }

    /// Checklist counters, if this is a checklist goal
    pub fn checklist_progress(&self) -> Option<&ChecklistProgress> {
        match &self.kind {
            GoalKind::Checklist(progress) => Some(progress),
            _ => None,
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.completed { "[X]" } else { "[ ]" };
        write!(f, "{} {} - {} points", status, self.name, self.points)?;
        if let GoalKind::Checklist(progress) = &self.kind {
            write!(
                f,
                " (Completed {}/{})",
                progress.current_count, progress.target_count
            )?;
        }
        Ok(())
    }
}
