pub mod account;
pub mod bank;
pub mod error;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountType};
pub use bank::{Bank, NewAccount};
pub use error::{BankError, BankResult};
pub use money::Cents;
pub use transaction::{Transaction, TransactionKind};
