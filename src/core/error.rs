use thiserror::Error;

use crate::core::money::Cents;

/// Failures surfaced by bank operations. Every failed operation leaves the
/// bank untouched. `login` is the deliberate exception to this taxonomy:
/// it answers with a bare boolean and never reveals whether the id was
/// unknown, the password wrong, or the account locked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    /// A required field was empty or blank.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    /// Deposits, withdrawals and transfers all need a positive amount.
    #[error("amount must be positive")]
    InvalidAmount,
    /// The operation needs an authenticated session.
    #[error("no account is signed in")]
    NotSignedIn,
    /// Amounts are in cents.
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Cents, requested: Cents },
    /// The transfer destination does not exist.
    #[error("no such account: {0}")]
    AccountNotFound(String),
    /// Transfers between an account and itself are refused.
    #[error("cannot transfer to the same account")]
    SelfTransfer,
}

pub type BankResult<T> = Result<T, BankError>;
