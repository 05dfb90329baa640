use chrono::{DateTime, Utc};
use colored::Colorize;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::account::AccountId;
use crate::core::money::{format_cents, Cents};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionKind {
    /// Category recorded when the caller does not supply one.
    pub fn default_category(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Transfer => "transfer",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.default_category())
    }
}

/// A single ledger entry. Amounts are signed: credits positive, debits
/// negative. Entries are immutable once recorded and are never deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: Cents,
    pub description: String,
    pub category: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// The other account involved, set on transfer entries only.
    pub counterparty: Option<AccountId>,
}

const TRANSACTION_ID_PREFIX: &str = "TXN";
const TRANSACTION_ID_LEN: usize = 12;

fn generate_transaction_id() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..TRANSACTION_ID_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("{}{}", TRANSACTION_ID_PREFIX, suffix)
}

impl Transaction {
    pub(crate) fn new(
        kind: TransactionKind,
        amount: Cents,
        description: &str,
        category: Option<&str>,
    ) -> Transaction {
        Transaction {
            id: generate_transaction_id(),
            kind,
            amount,
            description: description.to_owned(),
            category: Some(category.unwrap_or(kind.default_category()).to_owned()),
            timestamp: Utc::now(),
            counterparty: None,
        }
    }

    pub(crate) fn with_counterparty(mut self, account_id: &str) -> Transaction {
        self.counterparty = Some(account_id.to_owned());
        self
    }

    pub fn is_credit(&self) -> bool {
        self.amount > 0
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let amount = format_cents(self.amount);
        let amount = if self.amount < 0 {
            amount.red()
        } else {
            amount.green()
        };
        write!(
            f,
            "{} {} {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.kind.to_string().bold(),
            amount,
            self.description
        )
    }
}
