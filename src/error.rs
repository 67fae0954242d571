//! Error types shared by the goal model, persistence and configuration.

use std::fmt;

use thiserror::Error;

/// Where in a saved document a malformed record was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPosition {
    /// The top-level document (e.g. a missing `score` key)
    Document,
    /// A goal record, by zero-based position in the `goals` array
    Goal(usize),
}

impl fmt::Display for RecordPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordPosition::Document => write!(f, "document"),
            RecordPosition::Goal(index) => write!(f, "goal #{}", index),
        }
    }
}

#[derive(Debug, Error)]
pub enum QuestError {
    /// A goal failed its constructor checks
    #[error("Invalid goal: {0}")]
    InvalidGoal(String),

    /// A saved record is missing a required field or has an unusable value
    #[error("Malformed record at {position}: {reason}")]
    MalformedRecord {
        position: RecordPosition,
        reason: String,
    },

    /// A versioned save document this build does not understand
    #[error("Unsupported save format version {0}")]
    UnsupportedVersion(u32),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl QuestError {
    pub fn invalid_goal(msg: impl Into<String>) -> Self {
        Self::InvalidGoal(msg.into())
    }

    pub fn malformed(position: RecordPosition, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            position,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuestError>;
