use thiserror::Error;

use crate::core::Bank;

/// Storage port for the bank snapshot. Implementations decide where the
/// serialized blob lives; the bank itself never touches storage.
pub trait BankStore {
    /// Load the snapshot. An absent snapshot yields a fresh, empty bank.
    fn read(&self) -> Result<Bank>;
    /// Persist the whole snapshot.
    fn save(&self, bank: &Bank) -> Result<()>;
}

/// Storage being unavailable or corrupt is the one failure class that
/// propagates loudly instead of as a boolean.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("could not access bank state: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse bank state: {0}")]
    Format(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BackendError>;
