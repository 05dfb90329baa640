use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::interface::{BankStore, Result};
use crate::core::Bank;

/// File-backed store: the whole bank serializes into one JSON blob.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl AsRef<Path>) -> JsonStore {
        JsonStore {
            path: path.as_ref().to_owned(),
        }
    }
}

impl BankStore for JsonStore {
    fn read(&self) -> Result<Bank> {
        if !self.path.exists() {
            return Ok(Bank::new());
        }
        let blob = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&blob)?)
    }

    fn save(&self, bank: &Bank) -> Result<()> {
        let blob = serde_json::to_string_pretty(bank)?;
        // Write-then-rename so a crash mid-save cannot truncate the snapshot.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
