//! Persistence of the calculation log.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

use crate::calculations::Calculation;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Backend holding the serialized calculation log.
///
/// The log is stored as a JSON array of `{expression, answer}` objects.
pub trait CalculationStore {
    /// Load every stored calculation, oldest first.
    fn load(&self) -> StorageResult<Vec<Calculation>>;

    /// Replace the stored log.
    fn save(&self, calculations: &[Calculation]) -> StorageResult<()>;
}

/// Store for the current platform in its default location.
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> StorageResult<Box<dyn CalculationStore>> {
    Ok(Box::new(FileStore::default_location()?))
}

/// Store for the current platform in its default location.
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> StorageResult<Box<dyn CalculationStore>> {
    Ok(Box::new(LocalStorageStore::new()?))
}

pub(crate) fn encode(calculations: &[Calculation]) -> StorageResult<String> {
    serde_json::to_string(calculations).map_err(|e| StorageError::Serialization(e.to_string()))
}

pub(crate) fn decode(json: &str) -> StorageResult<Vec<Calculation>> {
    serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))
}
