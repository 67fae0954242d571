//! Save format selection.

use serde::{Deserialize, Serialize};

/// Version number written by [`SaveFormat::Tagged`]
pub const TAGGED_FORMAT_VERSION: u32 = 2;

/// Shape of the JSON document written on save
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveFormat {
    /// Unversioned document; goal kinds are inferred from fields on load
    #[default]
    Legacy,
    /// Versioned document with an explicit `kind` on every goal
    Tagged,
}

impl SaveFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveFormat::Legacy => "legacy",
            SaveFormat::Tagged => "tagged",
        }
    }

    /// Version written at the top of the document, if any
    pub fn version(&self) -> Option<u32> {
        match self {
            SaveFormat::Legacy => None,
            SaveFormat::Tagged => Some(TAGGED_FORMAT_VERSION),
        }
    }
}
