//! In-memory calculation store.

use super::{CalculationStore, StorageError, StorageResult, decode, encode};
use crate::calculations::Calculation;
use std::sync::RwLock;

/// In-memory store for testing and ephemeral use.
///
/// Keeps the serialized JSON so that corrupt data can be injected.
#[derive(Default)]
pub struct MemoryStore {
    json: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with raw JSON.
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: RwLock::new(Some(json.into())),
        }
    }

    /// Raw JSON currently stored.
    pub fn json(&self) -> Option<String> {
        self.json.read().ok().and_then(|json| json.clone())
    }
}

impl CalculationStore for MemoryStore {
    fn load(&self) -> StorageResult<Vec<Calculation>> {
        let json = self
            .json
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        match json.as_deref() {
            Some(json) => decode(json),
            None => Err(StorageError::NotFound("calculations".to_string())),
        }
    }

    fn save(&self, calculations: &[Calculation]) -> StorageResult<()> {
        let encoded = encode(calculations)?;
        let mut json = self
            .json
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        *json = Some(encoded);
        Ok(())
    }
}
