//! Tracker Configuration
//!
//! Settings loaded from a TOML file, with starter goals declared the same way
//! as any other goal definition.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{QuestError, Result};
use crate::goal::{Goal, GoalKindTag};
use crate::persistence::SaveFormat;

/// Config file read when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "eternal_quest.toml";

fn default_save_path() -> PathBuf {
    PathBuf::from("progress.json")
}

fn default_log_filter() -> String {
    "eternal_quest=info".to_string()
}

fn default_target_count() -> u32 {
    1
}

// ============================================================================
// Raw TOML Structures
// ============================================================================

/// Raw config file contents
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestConfig {
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,
    #[serde(default)]
    pub save_format: SaveFormat,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub starter_goals: Vec<RawGoalDefinition>,
}

/// Raw goal entry as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawGoalDefinition {
    pub kind: String,
    pub name: String,
    pub points: u32,
    #[serde(default = "default_target_count")]
    pub target_count: u32,
    #[serde(default)]
    pub bonus_points: u32,
}

impl RawGoalDefinition {
    pub fn to_goal(&self) -> Result<Goal> {
        let kind = GoalKindTag::from_str(&self.kind)
            .ok_or_else(|| QuestError::invalid_goal(format!("unknown goal kind '{}'", self.kind)))?;

        match kind {
            GoalKindTag::Simple => Goal::simple(self.name.clone(), self.points),
            GoalKindTag::Eternal => Goal::eternal(self.name.clone(), self.points),
            GoalKindTag::Checklist => Goal::checklist(
                self.name.clone(),
                self.points,
                self.target_count,
                self.bonus_points,
            ),
        }
    }
}

// ============================================================================
// Resolved Config
// ============================================================================

#[derive(Debug, Clone)]
pub struct QuestConfig {
    /// Where progress is saved and loaded
    pub save_path: PathBuf,
    pub save_format: SaveFormat,
    /// Default `tracing` filter directive, overridden by `RUST_LOG`
    pub log_filter: String,
    /// Goals a fresh ledger starts with
    pub starter_goals: Vec<Goal>,
}

impl QuestConfig {
    /// Settings used when no config file exists
    pub fn defaults() -> Result<Self> {
        Ok(Self {
            save_path: default_save_path(),
            save_format: SaveFormat::default(),
            log_filter: default_log_filter(),
            starter_goals: default_starter_goals()?,
        })
    }

    pub fn from_raw(raw: &RawQuestConfig) -> Result<Self> {
        let starter_goals = if raw.starter_goals.is_empty() {
            default_starter_goals()?
        } else {
            raw.starter_goals
                .iter()
                .enumerate()
                .map(|(i, g)| {
                    g.to_goal()
                        .map_err(|e| QuestError::Config(format!("starter goal {}: {}", i, e)))
                })
                .collect::<Result<Vec<_>>>()?
        };

        Ok(Self {
            save_path: raw.save_path.clone(),
            save_format: raw.save_format,
            log_filter: raw.log_filter.clone(),
            starter_goals,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let raw: RawQuestConfig =
            toml::from_str(contents).map_err(|e| QuestError::Config(e.to_string()))?;
        Self::from_raw(&raw)
    }

    /// Load config from `path`, falling back to defaults if the file is missing
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Config file does not exist: {:?}, using defaults", path);
                return Self::defaults();
            }
            Err(e) => return Err(e.into()),
        };

        let config = Self::from_toml(&contents).map_err(|e| match e {
            QuestError::Config(msg) => QuestError::Config(format!("{:?}: {}", path, msg)),
            other => other,
        })?;
        info!(
            "Loaded config from {:?} ({} starter goals, {} format)",
            path,
            config.starter_goals.len(),
            config.save_format.as_str()
        );
        Ok(config)
    }
}

/// The sample goals a new tracker starts with
fn default_starter_goals() -> Result<Vec<Goal>> {
    Ok(vec![
        Goal::simple("Run a marathon", 1000)?,
        Goal::eternal("Read scriptures", 100)?,
        Goal::checklist("Attend temple", 50, 10, 500)?,
    ])
}
