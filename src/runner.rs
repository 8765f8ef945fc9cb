//! Script replay
//!
//! The [`ScriptRunner`] applies commands to a [`Bank`] one at a time, in the
//! role of an ATM or teller session:
//!
//! - `login` lines start a PIN challenge. Further `login` lines for the same
//!   account continue that challenge, so three wrong PINs in a row block the
//!   account. Any other command abandons a pending challenge.
//! - Holder commands run against the account of the current holder session,
//!   admin commands need an admin session.
//! - A rejected command is logged and replay continues with the next one.
//!
//! After the last command the final account report is written as CSV.

use crate::config::BankConfig;
use crate::core::{AdminToken, AuthState, AuthToken, Bank, Clock, PinChallenge, SystemClock};
use crate::io::{write_accounts_csv, Command, ScriptReader};
use crate::types::{AccountId, AccountSummary, BankError, HistoryEntry, Pin};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::Path;

/// Who is currently logged in
#[derive(Debug, Clone, Default)]
pub enum Session {
    #[default]
    None,
    Holder(AuthToken),
    Admin(AdminToken),
}

/// Result of a successfully applied command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Opened(AccountId),
    Authenticated(AccountId),
    LoggedIn,
    LoggedOut,
    Balance(Decimal),
    /// `None` means the account has no transactions yet
    Statement(Option<Vec<HistoryEntry>>),
    Accounts(Vec<AccountSummary>),
    Account(AccountSummary),
    Total(Decimal),
    Done,
}

/// Applies commands to a bank while tracking the session
pub struct ScriptRunner {
    bank: Bank,
    session: Session,
    challenge: Option<PinChallenge>,
}

impl ScriptRunner {
    pub fn new(bank: Bank) -> Self {
        ScriptRunner {
            bank,
            session: Session::None,
            challenge: None,
        }
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Apply one command
    ///
    /// # Errors
    ///
    /// - `SessionRequired` if the command needs a session that is not active
    /// - Any error of the underlying bank operation
    pub fn apply(&mut self, command: Command) -> Result<Outcome, BankError> {
        let pending = self.challenge.take();

        match command {
            Command::Open { name, pin, kind } => {
                Ok(Outcome::Opened(self.bank.open_account(name, pin, kind)))
            }
            Command::Login { account, pin } => self.login(pending, account, pin),
            Command::Logout => {
                self.session = Session::None;
                Ok(Outcome::LoggedOut)
            }
            Command::Admin { user, password } => {
                self.session = Session::None;
                let token = self.bank.admin_login(&user, &password)?;
                self.session = Session::Admin(token);
                Ok(Outcome::LoggedIn)
            }
            Command::Overview => Ok(Outcome::Accounts(self.bank.overview())),
            holder @ (Command::Balance
            | Command::Deposit { .. }
            | Command::Withdraw { .. }
            | Command::Transfer { .. }
            | Command::Statement { .. }
            | Command::ChangePin { .. }
            | Command::Close) => self.apply_holder(holder),
            admin => self.apply_admin(admin),
        }
    }

    fn login(
        &mut self,
        pending: Option<PinChallenge>,
        account: AccountId,
        pin: Pin,
    ) -> Result<Outcome, BankError> {
        self.session = Session::None;

        let mut challenge = match pending {
            Some(challenge)
                if challenge.account() == account
                    && matches!(challenge.state(), AuthState::Challenging { .. }) =>
            {
                challenge
            }
            _ => self.bank.begin_login(account)?,
        };

        match self.bank.submit_pin(&mut challenge, pin) {
            Ok(token) => {
                self.session = Session::Holder(token);
                Ok(Outcome::Authenticated(account))
            }
            Err(e) => {
                self.challenge = Some(challenge);
                Err(e)
            }
        }
    }

    fn apply_holder(&mut self, command: Command) -> Result<Outcome, BankError> {
        let token = match &self.session {
            Session::Holder(token) => token.clone(),
            _ => return Err(BankError::session_required(command.name(), "account")),
        };

        match command {
            Command::Balance => self.bank.balance(&token).map(Outcome::Balance),
            Command::Deposit { amount } => self.bank.deposit(&token, amount).map(Outcome::Balance),
            Command::Withdraw { amount } => {
                self.bank.withdraw(&token, amount).map(Outcome::Balance)
            }
            Command::Transfer { target, amount } => self
                .bank
                .transfer(&token, target, amount)
                .map(|_| Outcome::Done),
            Command::Statement { count } => self
                .bank
                .mini_statement(&token, count)
                .map(Outcome::Statement),
            Command::ChangePin { pin } => self.bank.change_pin(&token, pin).map(|_| Outcome::Done),
            Command::Close => {
                self.bank.close_account(token)?;
                self.session = Session::None;
                Ok(Outcome::LoggedOut)
            }
            other => Err(BankError::invalid_command(
                other.name(),
                "not an account holder command",
            )),
        }
    }

    fn apply_admin(&mut self, command: Command) -> Result<Outcome, BankError> {
        let admin = match &self.session {
            Session::Admin(token) => token.clone(),
            _ => return Err(BankError::session_required(command.name(), "admin")),
        };

        match command {
            Command::List => Ok(Outcome::Accounts(self.bank.list_accounts(&admin))),
            Command::Find { account } => self
                .bank
                .find_account(&admin, account)
                .map(Outcome::Account),
            Command::Delete { account } => self
                .bank
                .delete_account(&admin, account)
                .map(|_| Outcome::Done),
            Command::Rename { account, name } => self
                .bank
                .rename_account(&admin, account, name)
                .map(|_| Outcome::Done),
            Command::ResetPin { account, pin } => self
                .bank
                .reset_pin(&admin, account, pin)
                .map(|_| Outcome::Done),
            Command::Block { account } => self
                .bank
                .block_account(&admin, account)
                .map(|_| Outcome::Done),
            Command::Unblock { account } => self
                .bank
                .unblock_account(&admin, account)
                .map(|_| Outcome::Done),
            Command::Total => self.bank.total_balance(&admin).map(Outcome::Total),
            Command::Sort(order) => {
                self.bank.sort_accounts(&admin, order);
                Ok(Outcome::Done)
            }
            other => Err(BankError::invalid_command(
                other.name(),
                "not an administrative command",
            )),
        }
    }

    /// Final account report in the store's current iteration order
    pub fn write_report(&self, output: &mut dyn Write) -> Result<(), BankError> {
        write_accounts_csv(&self.bank.overview(), output)
    }
}

/// Replay a script file and write the account report to `output`
///
/// # Errors
///
/// Only fatal errors are returned: the script cannot be opened or the report
/// cannot be written. Rejected commands are logged and skipped.
pub fn run_script(
    path: &Path,
    output: &mut dyn Write,
    config: BankConfig,
    clock: Box<dyn Clock>,
) -> Result<(), BankError> {
    let reader = ScriptReader::open(path)?;
    let mut runner = ScriptRunner::new(Bank::with_clock(config, clock));

    for line in reader {
        let result = line.command.and_then(|command| runner.apply(command));
        match result {
            Ok(outcome) => log_outcome(line.number, &outcome),
            Err(e) => tracing::warn!(line = line.number, "command rejected: {}", e),
        }
    }

    runner.write_report(output)
}

/// [`run_script`] with wall clock time
pub fn run_script_now(
    path: &Path,
    output: &mut dyn Write,
    config: BankConfig,
) -> Result<(), BankError> {
    run_script(path, output, config, Box::new(SystemClock))
}

fn log_outcome(line: u64, outcome: &Outcome) {
    match outcome {
        Outcome::Opened(id) => tracing::info!(line, account = id, "account created"),
        Outcome::Authenticated(id) => tracing::info!(line, account = id, "logged in"),
        Outcome::Balance(balance) => tracing::info!(line, balance = %balance, "balance"),
        Outcome::Total(total) => tracing::info!(line, total = %total, "total bank balance"),
        Outcome::Statement(None) => tracing::info!(line, "no transactions yet"),
        Outcome::Statement(Some(entries)) => {
            for entry in entries {
                tracing::info!(line, "{}", entry);
            }
        }
        Outcome::Accounts(accounts) => {
            if accounts.is_empty() {
                tracing::info!(line, "no accounts in the bank");
            }
            for account in accounts {
                log_summary(line, account);
            }
        }
        Outcome::Account(account) => log_summary(line, account),
        Outcome::LoggedIn | Outcome::LoggedOut | Outcome::Done => {
            tracing::debug!(line, ?outcome, "ok")
        }
    }
}

fn log_summary(line: u64, account: &AccountSummary) {
    tracing::info!(
        line,
        account = account.id,
        name = %account.owner_name,
        kind = %account.kind,
        balance = %account.balance,
        blocked = account.blocked,
        "account"
    );
}
