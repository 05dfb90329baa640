use std::sync::Mutex;

use crate::backend::interface::{BankStore, Result};
use crate::core::Bank;

/// Keeps the snapshot blob in memory. Useful for tests and for running a
/// throwaway bank without touching the filesystem.
#[derive(Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl BankStore for MemoryStore {
    fn read(&self) -> Result<Bank> {
        let blob = self.blob.lock().unwrap_or_else(|e| e.into_inner());
        match blob.as_deref() {
            Some(blob) => Ok(serde_json::from_str(blob)?),
            None => Ok(Bank::new()),
        }
    }

    fn save(&self, bank: &Bank) -> Result<()> {
        let serialized = serde_json::to_string(bank)?;
        *self.blob.lock().unwrap_or_else(|e| e.into_inner()) = Some(serialized);
        Ok(())
    }
}
