mod backend;
mod core;
pub mod notify;

pub use crate::core::{Account, AccountType, Bank, BankError, BankResult, Cents, NewAccount};
pub use crate::core::{Transaction, TransactionKind};
pub use crate::core::{account, bank, error, money, transaction};
pub use crate::backend::{BackendError, BankStore, JsonStore, MemoryStore};
