//! Browser `localStorage` calculation store (WASM only).

use super::{CalculationStore, StorageError, StorageResult, decode, encode};
use crate::calculations::Calculation;

/// Key under which the log is stored.
pub const STORAGE_KEY: &str = "calculationHistory";

/// Stores the calculation log in `window.localStorage`.
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    pub fn new() -> StorageResult<Self> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Other("No window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Other(format!("localStorage unavailable: {:?}", e)))?
            .ok_or_else(|| StorageError::Other("localStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl CalculationStore for LocalStorageStore {
    fn load(&self) -> StorageResult<Vec<Calculation>> {
        let json = self
            .storage
            .get_item(STORAGE_KEY)
            .map_err(|e| StorageError::Io(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::NotFound(STORAGE_KEY.to_string()))?;
        decode(&json)
    }

    fn save(&self, calculations: &[Calculation]) -> StorageResult<()> {
        let json = encode(calculations)?;
        self.storage
            .set_item(STORAGE_KEY, &json)
            .map_err(|e| StorageError::Io(format!("{:?}", e)))
    }
}
