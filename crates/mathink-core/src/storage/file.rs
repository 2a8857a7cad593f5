//! File-based calculation store for native platforms.

use super::{CalculationStore, StorageError, StorageResult, decode, encode};
use crate::calculations::Calculation;
use std::fs;
use std::path::{Path, PathBuf};

const FILE_NAME: &str = "calculations.json";

/// Stores the calculation log as a JSON file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by `path`. The parent directory is created on
    /// first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory.
    ///
    /// On Unix: `~/.local/share/mathink/calculations.json`
    /// On Windows: `%LOCALAPPDATA%\mathink\calculations.json`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Ok(Self::new(base.join("mathink").join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CalculationStore for FileStore {
    fn load(&self) -> StorageResult<Vec<Calculation>> {
        if !self.path.exists() {
            return Err(StorageError::NotFound(self.path.display().to_string()));
        }
        let json = fs::read_to_string(&self.path).map_err(|e| {
            StorageError::Io(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        decode(&json)
    }

    fn save(&self, calculations: &[Calculation]) -> StorageResult<()> {
        let json = encode(calculations)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(&self.path, json).map_err(|e| {
            StorageError::Io(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}
