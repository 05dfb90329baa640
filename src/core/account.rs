use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::money::Cents;
use crate::core::transaction::Transaction;

pub type AccountId = String;

/// Opening credit for new savings accounts, in cents.
pub const SAVINGS_WELCOME_BONUS: Cents = 10_000;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub fn opening_balance(&self) -> Cents {
        match self {
            AccountType::Savings => SAVINGS_WELCOME_BONUS,
            AccountType::Checking => 0,
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            other => Err(format!("unknown account type: {}", other)),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Checking => write!(f, "checking"),
            AccountType::Savings => write!(f, "savings"),
        }
    }
}

/// One bank account. Id, email and type are fixed at creation; balance,
/// transactions and the lock bookkeeping mutate in place. Accounts are
/// never deleted.
#[derive(Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub owner_name: String,
    pub email: String,
    /// Stored in the clear: this is a demo bank, not a credential vault.
    pub password: String,
    pub balance: Cents,
    /// Most recent entry first.
    pub transactions: Vec<Transaction>,
    pub created_at: DateTime<Utc>,
    pub account_type: AccountType,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub failed_login_attempts: u32,
    #[serde(default)]
    pub last_failed_login: Option<DateTime<Utc>>,
}

impl Account {
    pub(crate) fn new(
        id: AccountId,
        owner_name: &str,
        email: &str,
        password: &str,
        account_type: AccountType,
    ) -> Account {
        Account {
            id,
            owner_name: owner_name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            balance: account_type.opening_balance(),
            transactions: Vec::new(),
            created_at: Utc::now(),
            account_type,
            is_locked: false,
            failed_login_attempts: 0,
            last_failed_login: None,
        }
    }

    pub fn opening_balance(&self) -> Cents {
        self.account_type.opening_balance()
    }

    /// Sum of all recorded signed amounts, excluding the opening balance.
    pub fn transaction_total(&self) -> Cents {
        self.transactions.iter().map(|tx| tx.amount).sum()
    }

    /// Apply one entry: adjust the balance and prepend to the history.
    pub(crate) fn record(&mut self, transaction: Transaction) {
        self.balance += transaction.amount;
        self.transactions.insert(0, transaction);
    }

    pub(crate) fn reset_lock(&mut self) {
        self.is_locked = false;
        self.failed_login_attempts = 0;
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.owner_name)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account {} {} balance {} ({} transactions)",
            self.id,
            self.owner_name,
            self.balance,
            self.transactions.len()
        )
    }
}
