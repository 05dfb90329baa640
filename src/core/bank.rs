use chrono::{Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::account::{Account, AccountId, AccountType};
use crate::core::error::{BankError, BankResult};
use crate::core::money::Cents;
use crate::core::transaction::{Transaction, TransactionKind};
use crate::notify::{CredentialsMail, Notify};

/// Credentials of a freshly opened account, handed to the caller exactly
/// once for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub account_id: AccountId,
    pub password: String,
}

/// The whole bank: the canonical account collection, the single active
/// session and the app-lock state. Every operation is a synchronous
/// `&mut self` call, so mutations can never interleave.
///
/// Serializing a `Bank` yields the persistence snapshot: accounts and the
/// app-lock secret. The session and the unlock flag are skipped so a
/// reloaded bank always starts signed out and locked.
#[derive(Default, Serialize, Deserialize)]
pub struct Bank {
    accounts: Vec<Account>,
    app_password: Option<String>,
    #[serde(skip)]
    current_user: Option<AccountId>,
    #[serde(skip)]
    app_unlocked: bool,
    #[serde(skip)]
    notifier: Option<Box<dyn Notify>>,
}

fn required_field(name: &'static str, value: &str) -> BankResult<()> {
    if value.trim().is_empty() {
        Err(BankError::EmptyField(name))
    } else {
        Ok(())
    }
}

fn check_amount(amount: Cents) -> BankResult<()> {
    if amount <= 0 {
        Err(BankError::InvalidAmount)
    } else {
        Ok(())
    }
}

impl Bank {
    pub const MAX_FAILED_LOGINS: u32 = 3;
    pub const LOCKOUT_MINUTES: i64 = 15;

    pub fn new() -> Bank {
        Bank::default()
    }

    /// Attach the outbound notifier used on account creation. A bank
    /// without one simply skips the credential mail.
    pub fn set_notifier(&mut self, notifier: Box<dyn Notify>) {
        self.notifier = Some(notifier);
    }

    // ---- lookups ------------------------------------------------------

    fn find_account(&self, account_id: &str) -> Option<usize> {
        let wanted = account_id.to_uppercase();
        self.accounts.iter().position(|acc| acc.id == wanted)
    }

    /// Pure lookup by id, case-insensitive.
    pub fn account(&self, account_id: &str) -> Option<&Account> {
        self.find_account(account_id).map(|idx| &self.accounts[idx])
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn current_user(&self) -> Option<&Account> {
        let id = self.current_user.as_deref()?;
        self.account(id)
    }

    /// Case-insensitive substring search against owner name or account id,
    /// in storage order. The signed-in account never appears in its own
    /// results, even on an exact match.
    pub fn search_accounts(&self, query: &str) -> Vec<&Account> {
        let needle = query.to_lowercase();
        let own_id = self.current_user.as_deref();
        self.accounts
            .iter()
            .filter(|acc| Some(acc.id.as_str()) != own_id)
            .filter(|acc| {
                acc.owner_name.to_lowercase().contains(&needle)
                    || acc.id.to_lowercase().contains(&needle)
            })
            .collect()
    }

    // ---- account lifecycle --------------------------------------------

    /// Open a new account. Savings accounts start with the welcome bonus,
    /// checking accounts with zero. After the account is stored, the
    /// configured notifier is handed the credentials; notification failure
    /// never rolls back creation.
    pub fn create_account(
        &mut self,
        owner_name: &str,
        email: &str,
        password: &str,
        account_type: AccountType,
    ) -> BankResult<NewAccount> {
        required_field("owner name", owner_name)?;
        required_field("email", email)?;
        required_field("password", password)?;

        let account_id = self.generate_account_id(owner_name);
        let account = Account::new(account_id.clone(), owner_name, email, password, account_type);
        self.accounts.push(account);

        if let Some(notifier) = &self.notifier {
            notifier.account_created(&CredentialsMail {
                email: email.to_owned(),
                account_id: account_id.clone(),
                password: password.to_owned(),
            });
        }

        Ok(NewAccount {
            account_id,
            password: password.to_owned(),
        })
    }

    /// Ids are the owner's initials plus a six-digit suffix, regenerated
    /// until unique.
    fn generate_account_id(&self, owner_name: &str) -> AccountId {
        let initials: String = owner_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(|c| c.to_uppercase())
            .collect();
        let prefix = if initials.is_empty() {
            "AC".to_owned()
        } else {
            initials
        };

        let mut rng = rand::thread_rng();
        loop {
            let candidate = format!("{}{:06}", prefix, rng.gen_range(0..1_000_000));
            if self.find_account(&candidate).is_none() {
                return candidate;
            }
        }
    }

    // ---- authentication -----------------------------------------------

    /// Authenticate and open the session. Three wrong passwords lock the
    /// account; the lock expires lazily once the cooldown has elapsed at
    /// the next attempt. Returns only a boolean: callers learn nothing
    /// about why a login failed.
    pub fn login(&mut self, account_id: &str, password: &str) -> bool {
        let Some(idx) = self.find_account(account_id) else {
            return false;
        };
        let now = Utc::now();

        if self.accounts[idx].is_locked {
            let elapsed = self.accounts[idx]
                .last_failed_login
                .map(|at| now - at)
                .unwrap_or_else(Duration::zero);
            if elapsed < Duration::minutes(Self::LOCKOUT_MINUTES) {
                // Still cooling down: no attempt is consumed.
                return false;
            }
            self.accounts[idx].reset_lock();
        }

        if self.accounts[idx].password == password {
            self.accounts[idx].reset_lock();
            self.current_user = Some(self.accounts[idx].id.clone());
            return true;
        }

        let account = &mut self.accounts[idx];
        account.failed_login_attempts += 1;
        account.last_failed_login = Some(now);
        if account.failed_login_attempts >= Self::MAX_FAILED_LOGINS {
            account.is_locked = true;
        }
        false
    }

    /// Clears the session only; account records and the app lock are
    /// untouched.
    pub fn logout(&mut self) {
        self.current_user = None;
    }

    /// Administrative reset of the lock state and failure counter.
    pub fn unlock_account(&mut self, account_id: &str) {
        if let Some(idx) = self.find_account(account_id) {
            self.accounts[idx].reset_lock();
        }
    }

    fn session_account(&self) -> BankResult<usize> {
        let id = self.current_user.as_deref().ok_or(BankError::NotSignedIn)?;
        self.accounts
            .iter()
            .position(|acc| acc.id == id)
            .ok_or(BankError::NotSignedIn)
    }

    // ---- balance mutation ---------------------------------------------

    pub fn deposit(&mut self, amount: Cents, description: &str, category: Option<&str>) -> BankResult<()> {
        let idx = self.session_account()?;
        check_amount(amount)?;

        let tx = Transaction::new(TransactionKind::Deposit, amount, description, category);
        self.accounts[idx].record(tx);
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Cents, description: &str, category: Option<&str>) -> BankResult<()> {
        let idx = self.session_account()?;
        check_amount(amount)?;

        let balance = self.accounts[idx].balance;
        if amount > balance {
            return Err(BankError::InsufficientFunds {
                balance,
                requested: amount,
            });
        }

        let tx = Transaction::new(TransactionKind::Withdrawal, -amount, description, category);
        self.accounts[idx].record(tx);
        Ok(())
    }

    /// Move money from the signed-in account to another. Both balances and
    /// both histories change inside this one call; a failed precondition
    /// leaves everything untouched.
    pub fn transfer(
        &mut self,
        to_account_id: &str,
        amount: Cents,
        description: &str,
        category: Option<&str>,
    ) -> BankResult<()> {
        let from_idx = self.session_account()?;
        check_amount(amount)?;

        let to_idx = self
            .find_account(to_account_id)
            .ok_or_else(|| BankError::AccountNotFound(to_account_id.to_uppercase()))?;
        if to_idx == from_idx {
            return Err(BankError::SelfTransfer);
        }

        let balance = self.accounts[from_idx].balance;
        if amount > balance {
            return Err(BankError::InsufficientFunds {
                balance,
                requested: amount,
            });
        }

        let (from_id, from_owner) = {
            let acc = &self.accounts[from_idx];
            (acc.id.clone(), acc.owner_name.clone())
        };
        let (to_id, to_owner) = {
            let acc = &self.accounts[to_idx];
            (acc.id.clone(), acc.owner_name.clone())
        };

        let outgoing_description = if description.trim().is_empty() {
            format!("Transfer to {} ({})", to_owner, to_id)
        } else {
            description.to_owned()
        };
        let incoming_description = format!("Transfer from {} ({})", from_owner, from_id);

        let outgoing =
            Transaction::new(TransactionKind::Transfer, -amount, &outgoing_description, category)
                .with_counterparty(&to_id);
        let incoming =
            Transaction::new(TransactionKind::Transfer, amount, &incoming_description, category)
                .with_counterparty(&from_id);

        self.accounts[from_idx].record(outgoing);
        self.accounts[to_idx].record(incoming);
        Ok(())
    }

    // ---- app lock -----------------------------------------------------

    /// Store the shared app secret and unlock. Set once on first run;
    /// resetting it is out of scope here.
    pub fn set_app_password(&mut self, password: &str) {
        self.app_password = Some(password.to_owned());
        self.app_unlocked = true;
    }

    /// Check the app secret; a match unlocks the app. There is no retry
    /// lockout on the app gate, only on account login.
    pub fn verify_app_password(&mut self, password: &str) -> bool {
        match &self.app_password {
            Some(secret) if secret == password => {
                self.app_unlocked = true;
                true
            }
            _ => false,
        }
    }

    pub fn has_app_password(&self) -> bool {
        self.app_password.is_some()
    }

    pub fn is_app_unlocked(&self) -> bool {
        self.app_unlocked
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{Duration, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::core::account::SAVINGS_WELCOME_BONUS;
    use crate::notify::{CredentialsMail, Notify};

    fn assert_balances_consistent(bank: &Bank) {
        for acc in bank.accounts() {
            assert_eq!(
                acc.balance,
                acc.opening_balance() + acc.transaction_total(),
                "balance of {} drifted from its transaction history",
                acc.id
            );
        }
    }

    /// A bank with one savings account (Alice) and one checking account
    /// (Bob), nobody signed in.
    #[fixture]
    fn bank() -> (Bank, NewAccount, NewAccount) {
        let mut bank = Bank::new();
        let alice = bank
            .create_account("Alice Smith", "alice@example.com", "hunter2", AccountType::Savings)
            .unwrap();
        let bob = bank
            .create_account("Bob Jones", "bob@example.com", "swordfish", AccountType::Checking)
            .unwrap();
        (bank, alice, bob)
    }

    // ---- creation -----------------------------------------------------

    #[rstest]
    fn savings_account_starts_with_bonus(bank: (Bank, NewAccount, NewAccount)) {
        let (bank, alice, bob) = bank;
        let alice = bank.account(&alice.account_id).unwrap();
        assert_eq!(alice.balance, SAVINGS_WELCOME_BONUS);
        assert!(alice.transactions.is_empty());

        let bob = bank.account(&bob.account_id).unwrap();
        assert_eq!(bob.balance, 0);
        assert_balances_consistent(&bank);
    }

    #[rstest]
    fn account_id_uses_owner_initials(bank: (Bank, NewAccount, NewAccount)) {
        let (_, alice, bob) = bank;
        assert!(alice.account_id.starts_with("AS"));
        assert!(bob.account_id.starts_with("BJ"));
    }

    #[test]
    fn repeated_owners_get_distinct_ids() {
        let mut bank = Bank::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            let created = bank
                .create_account("John Doe", "john@example.com", "pw", AccountType::Checking)
                .unwrap();
            assert!(seen.insert(created.account_id));
        }
    }

    #[test]
    fn creation_rejects_blank_fields() {
        let mut bank = Bank::new();
        let res = bank.create_account("  ", "a@b.c", "pw", AccountType::Checking);
        assert_eq!(res, Err(BankError::EmptyField("owner name")));
        let res = bank.create_account("Jane", "", "pw", AccountType::Checking);
        assert_eq!(res, Err(BankError::EmptyField("email")));
        let res = bank.create_account("Jane", "a@b.c", "", AccountType::Checking);
        assert_eq!(res, Err(BankError::EmptyField("password")));
        assert!(bank.accounts().is_empty());
    }

    struct RecordingNotifier(Arc<Mutex<Vec<CredentialsMail>>>);

    impl Notify for RecordingNotifier {
        fn account_created(&self, mail: &CredentialsMail) {
            self.0.lock().unwrap().push(mail.clone());
        }
    }

    #[test]
    fn notifier_receives_credentials_once_per_creation() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut bank = Bank::new();
        bank.set_notifier(Box::new(RecordingNotifier(sent.clone())));

        let created = bank
            .create_account("Jane Roe", "jane@example.com", "pw123", AccountType::Savings)
            .unwrap();
        bank.create_account("", "x@y.z", "pw", AccountType::Checking)
            .unwrap_err();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].account_id, created.account_id);
        assert_eq!(sent[0].email, "jane@example.com");
        assert_eq!(sent[0].password, "pw123");
    }

    // ---- login & lockout ----------------------------------------------

    #[rstest]
    fn login_opens_session(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, _) = bank;
        assert!(bank.login(&alice.account_id, "hunter2"));
        assert_eq!(bank.current_user().unwrap().id, alice.account_id);
    }

    #[rstest]
    fn login_is_case_insensitive_on_id(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, _) = bank;
        assert!(bank.login(&alice.account_id.to_lowercase(), "hunter2"));
    }

    #[rstest]
    fn failed_login_leaves_no_session(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, _) = bank;
        assert!(!bank.login(&alice.account_id, "wrong"));
        assert!(bank.current_user().is_none());
    }

    #[test]
    fn unknown_account_login_changes_nothing() {
        let mut bank = Bank::new();
        assert!(!bank.login("ZZ000000", "pw"));
        assert!(bank.current_user().is_none());
    }

    #[rstest]
    fn three_failures_lock_the_account(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, _) = bank;
        for _ in 0..3 {
            assert!(!bank.login(&alice.account_id, "wrong"));
        }
        let acc = bank.account(&alice.account_id).unwrap();
        assert!(acc.is_locked);
        assert_eq!(acc.failed_login_attempts, 3);

        // A fourth attempt inside the cooldown is rejected without
        // consuming another attempt, even with the right password.
        assert!(!bank.login(&alice.account_id, "hunter2"));
        let acc = bank.account(&alice.account_id).unwrap();
        assert_eq!(acc.failed_login_attempts, 3);
    }

    #[rstest]
    fn lock_expires_after_cooldown(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, _) = bank;
        for _ in 0..3 {
            bank.login(&alice.account_id, "wrong");
        }

        // Rewind the failure stamp past the cooldown window.
        let idx = bank.find_account(&alice.account_id).unwrap();
        bank.accounts[idx].last_failed_login =
            Some(Utc::now() - Duration::minutes(Bank::LOCKOUT_MINUTES + 1));

        assert!(bank.login(&alice.account_id, "hunter2"));
        let acc = bank.account(&alice.account_id).unwrap();
        assert!(!acc.is_locked);
        assert_eq!(acc.failed_login_attempts, 0);
    }

    #[rstest]
    fn lock_expires_at_exactly_the_cooldown_boundary(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, _) = bank;
        for _ in 0..3 {
            bank.login(&alice.account_id, "wrong");
        }

        // Rewind by the full cooldown, not a minute past it. The window
        // is exclusive, so an attempt at minute fifteen sharp is a fresh
        // credential check.
        let idx = bank.find_account(&alice.account_id).unwrap();
        bank.accounts[idx].last_failed_login =
            Some(Utc::now() - Duration::minutes(Bank::LOCKOUT_MINUTES));

        assert!(bank.login(&alice.account_id, "hunter2"));
        let acc = bank.account(&alice.account_id).unwrap();
        assert!(!acc.is_locked);
        assert_eq!(acc.failed_login_attempts, 0);
    }

    #[rstest]
    fn expired_lock_with_wrong_password_starts_counting_afresh(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, _) = bank;
        for _ in 0..3 {
            bank.login(&alice.account_id, "wrong");
        }
        let idx = bank.find_account(&alice.account_id).unwrap();
        bank.accounts[idx].last_failed_login =
            Some(Utc::now() - Duration::minutes(Bank::LOCKOUT_MINUTES + 1));

        assert!(!bank.login(&alice.account_id, "still wrong"));
        let acc = bank.account(&alice.account_id).unwrap();
        assert!(!acc.is_locked);
        assert_eq!(acc.failed_login_attempts, 1);
    }

    #[rstest]
    fn unlock_account_resets_lock_state(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, _) = bank;
        for _ in 0..3 {
            bank.login(&alice.account_id, "wrong");
        }
        bank.unlock_account(&alice.account_id);
        assert!(bank.login(&alice.account_id, "hunter2"));
    }

    #[rstest]
    fn logout_clears_only_the_session(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, _) = bank;
        bank.set_app_password("gate");
        bank.login(&alice.account_id, "hunter2");
        bank.logout();
        assert!(bank.current_user().is_none());
        assert!(bank.is_app_unlocked());
        assert!(bank.account(&alice.account_id).is_some());
    }

    // ---- deposits & withdrawals ---------------------------------------

    #[rstest]
    fn deposit_requires_session(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, _, _) = bank;
        assert_eq!(bank.deposit(1000, "pay", None), Err(BankError::NotSignedIn));
    }

    #[rstest]
    #[case(0)]
    #[case(-500)]
    fn deposit_rejects_non_positive_amounts(bank: (Bank, NewAccount, NewAccount), #[case] amount: Cents) {
        let (mut bank, alice, _) = bank;
        bank.login(&alice.account_id, "hunter2");
        assert_eq!(bank.deposit(amount, "pay", None), Err(BankError::InvalidAmount));
        assert_eq!(bank.account(&alice.account_id).unwrap().balance, SAVINGS_WELCOME_BONUS);
        assert_balances_consistent(&bank);
    }

    #[rstest]
    fn deposit_then_withdraw_restores_balance(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, _) = bank;
        bank.login(&alice.account_id, "hunter2");
        let before = bank.current_user().unwrap().balance;

        bank.deposit(4200, "pay", Some("salary")).unwrap();
        bank.withdraw(4200, "rent", Some("housing")).unwrap();

        let acc = bank.account(&alice.account_id).unwrap();
        assert_eq!(acc.balance, before);
        assert_eq!(acc.transactions.len(), 2);
        assert_eq!(acc.transactions[0].amount, -4200);
        assert_eq!(acc.transactions[1].amount, 4200);
        assert_balances_consistent(&bank);
    }

    #[rstest]
    fn withdraw_beyond_balance_is_refused(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, _) = bank;
        bank.login(&alice.account_id, "hunter2");
        let res = bank.withdraw(SAVINGS_WELCOME_BONUS + 1, "too much", None);
        assert_eq!(
            res,
            Err(BankError::InsufficientFunds {
                balance: SAVINGS_WELCOME_BONUS,
                requested: SAVINGS_WELCOME_BONUS + 1,
            })
        );
        let acc = bank.account(&alice.account_id).unwrap();
        assert_eq!(acc.balance, SAVINGS_WELCOME_BONUS);
        assert!(acc.transactions.is_empty());
    }

    // ---- transfers ----------------------------------------------------

    #[rstest]
    fn transfer_moves_money_and_links_both_sides(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, bob) = bank;
        bank.login(&alice.account_id, "hunter2");
        bank.transfer(&bob.account_id, 2500, "lunch", Some("food")).unwrap();

        let sender = bank.account(&alice.account_id).unwrap();
        let receiver = bank.account(&bob.account_id).unwrap();

        assert_eq!(sender.balance, SAVINGS_WELCOME_BONUS - 2500);
        assert_eq!(receiver.balance, 2500);

        let out = &sender.transactions[0];
        assert_eq!(out.amount, -2500);
        assert_eq!(out.counterparty.as_deref(), Some(bob.account_id.as_str()));
        assert_eq!(out.description, "lunch");

        let inc = &receiver.transactions[0];
        assert_eq!(inc.amount, 2500);
        assert_eq!(inc.counterparty.as_deref(), Some(alice.account_id.as_str()));
        assert!(inc.description.starts_with("Transfer from Alice Smith"));

        assert_balances_consistent(&bank);
    }

    #[rstest]
    fn transfer_without_description_generates_one(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, bob) = bank;
        bank.login(&alice.account_id, "hunter2");
        bank.transfer(&bob.account_id, 100, "", None).unwrap();

        let out = &bank.account(&alice.account_id).unwrap().transactions[0];
        assert!(out.description.starts_with("Transfer to Bob Jones"));
    }

    #[rstest]
    fn transfer_beyond_balance_touches_neither_side(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, bob) = bank;
        bank.login(&alice.account_id, "hunter2");
        let res = bank.transfer(&bob.account_id, SAVINGS_WELCOME_BONUS * 2, "too much", None);
        assert!(matches!(res, Err(BankError::InsufficientFunds { .. })));

        assert_eq!(bank.account(&alice.account_id).unwrap().balance, SAVINGS_WELCOME_BONUS);
        assert_eq!(bank.account(&bob.account_id).unwrap().balance, 0);
        assert!(bank.account(&bob.account_id).unwrap().transactions.is_empty());
    }

    #[rstest]
    fn transfer_to_unknown_account_changes_nothing(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, _) = bank;
        bank.login(&alice.account_id, "hunter2");
        let res = bank.transfer("ZZ999999", 100, "ghost", None);
        assert_eq!(res, Err(BankError::AccountNotFound("ZZ999999".into())));

        let acc = bank.account(&alice.account_id).unwrap();
        assert_eq!(acc.balance, SAVINGS_WELCOME_BONUS);
        assert!(acc.transactions.is_empty());
    }

    #[rstest]
    fn transfer_to_self_is_refused(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, _) = bank;
        bank.login(&alice.account_id, "hunter2");
        let res = bank.transfer(&alice.account_id.to_lowercase(), 100, "round trip", None);
        assert_eq!(res, Err(BankError::SelfTransfer));
        assert!(bank.account(&alice.account_id).unwrap().transactions.is_empty());
    }

    // ---- the full walkthrough -----------------------------------------

    #[test]
    fn savings_walkthrough() {
        let mut bank = Bank::new();
        let alice = bank
            .create_account("Alice Smith", "alice@example.com", "pw", AccountType::Savings)
            .unwrap();
        let bob = bank
            .create_account("Bob Jones", "bob@example.com", "pw", AccountType::Checking)
            .unwrap();

        assert!(bank.login(&alice.account_id, "pw"));
        assert_eq!(bank.current_user().unwrap().balance, 10_000);

        bank.deposit(5000, "pay", None).unwrap();
        let acc = bank.account(&alice.account_id).unwrap();
        assert_eq!(acc.balance, 15_000);
        assert_eq!(acc.transactions.len(), 1);

        assert!(bank.withdraw(20_000, "too much", None).is_err());
        assert_eq!(bank.account(&alice.account_id).unwrap().balance, 15_000);

        bank.transfer(&bob.account_id, 10_000, "", None).unwrap();
        assert_eq!(bank.account(&alice.account_id).unwrap().balance, 5000);
        assert_eq!(bank.account(&bob.account_id).unwrap().balance, 10_000);
        assert_eq!(bank.account(&alice.account_id).unwrap().transactions.len(), 2);
        assert_eq!(bank.account(&bob.account_id).unwrap().transactions.len(), 1);

        assert_balances_consistent(&bank);
    }

    // ---- search -------------------------------------------------------

    #[rstest]
    fn search_matches_name_and_id_but_never_self(bank: (Bank, NewAccount, NewAccount)) {
        let (mut bank, alice, bob) = bank;
        bank.login(&alice.account_id, "hunter2");

        let hits = bank.search_accounts("bob");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, bob.account_id);

        let by_id = bank.search_accounts(&bob.account_id.to_lowercase());
        assert_eq!(by_id.len(), 1);

        // Exact own-name query still excludes the searcher.
        let own = bank.search_accounts("Alice Smith");
        assert!(own.is_empty());
    }

    #[rstest]
    fn search_without_session_sees_everyone(bank: (Bank, NewAccount, NewAccount)) {
        let (bank, _, _) = bank;
        assert_eq!(bank.search_accounts("").len(), 2);
    }

    // ---- app lock -----------------------------------------------------

    #[test]
    fn app_password_gate() {
        let mut bank = Bank::new();
        assert!(!bank.has_app_password());
        assert!(!bank.is_app_unlocked());
        assert!(!bank.verify_app_password("anything"));

        bank.set_app_password("open sesame");
        assert!(bank.has_app_password());
        assert!(bank.is_app_unlocked());

        let mut reloaded: Bank =
            serde_json::from_str(&serde_json::to_string(&bank).unwrap()).unwrap();
        assert!(reloaded.has_app_password());
        assert!(!reloaded.is_app_unlocked());
        assert!(!reloaded.verify_app_password("wrong"));
        assert!(!reloaded.is_app_unlocked());
        assert!(reloaded.verify_app_password("open sesame"));
        assert!(reloaded.is_app_unlocked());
    }
}
