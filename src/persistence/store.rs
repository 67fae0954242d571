//! Progress Stores
//!
//! Where saved documents live. The ledger only needs "read the saved text, if
//! any" and "write this text".

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

pub trait ProgressStore {
    /// Saved document contents, or `None` if nothing has been saved
    fn read(&self) -> Result<Option<String>>;

    fn write(&self, contents: &str) -> Result<()>;
}

/// Saved progress in a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonFileStore {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                debug!("Read {} bytes from {:?}", contents.len(), self.path);
                Ok(Some(contents))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Progress file does not exist: {:?}", self.path);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, contents)?;
        debug!("Wrote {} bytes to {:?}", contents.len(), self.path);
        Ok(())
    }
}

/// In-memory store, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    contents: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: RefCell::new(Some(contents.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl ProgressStore for MemoryStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents.borrow().clone())
    }

    fn write(&self, contents: &str) -> Result<()> {
        *self.contents.borrow_mut() = Some(contents.to_string());
        Ok(())
    }
}
