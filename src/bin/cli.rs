use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use unibank::money::{format_cents, parse_cents};
use unibank::notify::HttpNotifier;
use unibank::{Account, AccountType, Bank, BankStore, Cents, JsonStore};

#[derive(Parser, Debug)]
#[clap(version, about, propagate_version = true)]
struct Cli {
    /// Path to the bank snapshot file to operate on
    #[clap(value_parser)]
    path: PathBuf,

    /// App-lock password; required once one has been set
    #[clap(short = 'P', long, global = true)]
    app_password: Option<String>,

    /// Mailer endpoint credential mails are posted to on account creation
    #[clap(long, global = true)]
    mailer: Option<String>,

    /// Action to perform
    #[clap(subcommand)]
    action: Subcommands,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// Open a new account and print its credentials
    CreateAccount(CreateAccount),
    /// Protect the bank with an app-lock password (first run only)
    SetAppPassword(SetAppPassword),
    /// Show an account's balance
    Balance(Credentials),
    /// List an account's transactions, most recent first
    History(History),
    /// Pay money into an account
    Deposit(Movement),
    /// Take money out of an account
    Withdraw(Movement),
    /// Move money to another account
    Transfer(Transfer),
    /// Find other accounts by owner name or id
    Search(Search),
}

#[derive(Args, Debug)]
struct CreateAccount {
    /// Full name of the account owner
    #[clap(short, long, value_parser)]
    name: String,

    #[clap(short, long, value_parser)]
    email: String,

    #[clap(short, long, value_parser)]
    password: String,

    /// checking or savings
    #[clap(short = 't', long = "type", value_parser = AccountType::from_str, default_value = "checking")]
    account_type: AccountType,
}

#[derive(Args, Debug)]
struct SetAppPassword {
    #[clap(value_parser)]
    password: String,
}

#[derive(Args, Debug)]
struct Credentials {
    /// Account id to sign in with
    #[clap(short, long, value_parser)]
    account: String,

    #[clap(short, long, value_parser)]
    password: String,
}

#[derive(Args, Debug)]
struct History {
    #[clap(flatten)]
    credentials: Credentials,

    /// Show at most this many entries
    #[clap(short, long, value_parser)]
    limit: Option<usize>,
}

#[derive(Args, Debug)]
struct Movement {
    #[clap(flatten)]
    credentials: Credentials,

    #[clap(short = 'm', long, value_parser = parse_cents)]
    amount: Cents,

    #[clap(short, long, value_parser, default_value_t = String::new())]
    description: String,

    #[clap(short, long, value_parser)]
    category: Option<String>,
}

#[derive(Args, Debug)]
struct Transfer {
    #[clap(flatten)]
    movement: Movement,

    /// Destination account id
    #[clap(short, long, value_parser)]
    to: String,
}

#[derive(Args, Debug)]
struct Search {
    #[clap(flatten)]
    credentials: Credentials,

    #[clap(value_parser)]
    query: String,
}

fn sign_in(store: &JsonStore, bank: &mut Bank, credentials: &Credentials) -> anyhow::Result<()> {
    if !bank.login(&credentials.account, &credentials.password) {
        // A failed login still mutates the account (failure counter, lock
        // state); persist it so attempts across invocations count toward
        // the lockout.
        store.save(bank).context("could not save the bank snapshot")?;
        // The bank only answers with a boolean; don't guess at the reason.
        bail!("login failed: check the account id and password, or try again later");
    }
    Ok(())
}

fn print_balance(account: &Account) {
    let balance = format_cents(account.balance);
    let balance = if account.balance < 0 {
        balance.bright_red()
    } else if account.balance > 0 {
        balance.green()
    } else {
        balance.normal()
    };
    println!("{}: {}", account, balance);
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Cli::parse();

    let store = JsonStore::new(&args.path);
    let mut bank = store.read().context("could not load the bank snapshot")?;

    if let Some(endpoint) = &args.mailer {
        bank.set_notifier(Box::new(HttpNotifier::new(endpoint.clone())));
    }

    if let Subcommands::SetAppPassword(set) = &args.action {
        if bank.has_app_password() {
            bail!("an app password is already set");
        }
        bank.set_app_password(&set.password);
        println!("{}", "App password set".green());
        store.save(&bank).context("could not save the bank snapshot")?;
        return Ok(());
    }

    // Everything else sits behind the app gate once a password exists.
    if bank.has_app_password() {
        let supplied = args
            .app_password
            .as_deref()
            .context("this bank is protected; pass --app-password")?;
        if !bank.verify_app_password(supplied) {
            bail!("wrong app password");
        }
    }

    match &args.action {
        Subcommands::SetAppPassword(_) => unreachable!("handled above"),
        Subcommands::CreateAccount(create) => {
            let created = bank.create_account(
                &create.name,
                &create.email,
                &create.password,
                create.account_type,
            )?;
            println!("Account created for {}", create.name.bold());
            println!("  Account ID: {}", created.account_id.bold());
            println!("  Password:   {}", created.password);
            println!("Save these credentials; the password is not shown again.");
        }
        Subcommands::Balance(credentials) => {
            sign_in(&store, &mut bank, credentials)?;
            let account = bank.current_user().context("no active session")?;
            print_balance(account);
        }
        Subcommands::History(history) => {
            sign_in(&store, &mut bank, &history.credentials)?;
            let account = bank.current_user().context("no active session")?;
            let limit = history.limit.unwrap_or(usize::MAX);
            for tx in account.transactions.iter().take(limit) {
                println!("{}", tx);
            }
        }
        Subcommands::Deposit(movement) => {
            sign_in(&store, &mut bank, &movement.credentials)?;
            bank.deposit(
                movement.amount,
                &movement.description,
                movement.category.as_deref(),
            )?;
            print_balance(bank.current_user().context("no active session")?);
        }
        Subcommands::Withdraw(movement) => {
            sign_in(&store, &mut bank, &movement.credentials)?;
            bank.withdraw(
                movement.amount,
                &movement.description,
                movement.category.as_deref(),
            )?;
            print_balance(bank.current_user().context("no active session")?);
        }
        Subcommands::Transfer(transfer) => {
            sign_in(&store, &mut bank, &transfer.movement.credentials)?;
            bank.transfer(
                &transfer.to,
                transfer.movement.amount,
                &transfer.movement.description,
                transfer.movement.category.as_deref(),
            )?;
            print_balance(bank.current_user().context("no active session")?);
        }
        Subcommands::Search(search) => {
            sign_in(&store, &mut bank, &search.credentials)?;
            for account in bank.search_accounts(&search.query) {
                println!("{}", account);
            }
        }
    }

    store.save(&bank).context("could not save the bank snapshot")?;
    Ok(())
}
