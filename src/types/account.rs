//! Account-related types for the bank ledger
//!
//! This module defines the [`Account`] entity and the per-kind rules applied to
//! deposits and withdrawals. The set of account kinds is closed: every rule is
//! an exhaustive `match` on [`AccountKind`].

use super::error::BankError;
use super::history::{EntryKind, HistoryEntry, TransactionLog};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Account identifier
///
/// Allocated monotonically by the account store and never reused.
pub type AccountId = u64;

/// Balance a Current account must keep after every withdrawal
pub const CURRENT_MINIMUM_BALANCE: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Interest credited on each Savings deposit (2%)
pub const SAVINGS_INTEREST_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);

/// Kinds of account offered by the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    /// Earns 2% interest on the balance after every deposit.
    /// A withdrawal must leave a strictly positive balance.
    Savings,

    /// No interest. A withdrawal must leave at least the minimum balance.
    Current,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKind::Savings => f.write_str("Savings"),
            AccountKind::Current => f.write_str("Current"),
        }
    }
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "savings" => Ok(AccountKind::Savings),
            "current" => Ok(AccountKind::Current),
            other => Err(format!("unknown account kind '{}'", other)),
        }
    }
}

/// Four digit account PIN (1000..=9999)
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Pin(u16);

impl Pin {
    /// Validate a four digit PIN
    pub fn new(value: u16) -> Result<Self, BankError> {
        if (1000..=9999).contains(&value) {
            Ok(Pin(value))
        } else {
            Err(BankError::invalid_pin(value))
        }
    }
}

impl FromStr for Pin {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<u16>().map_err(|_| BankError::invalid_pin(s))?;
        Pin::new(value)
    }
}

// Keeps PINs out of logs and panic messages.
impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// A bank account
///
/// Owned exclusively by the account store. Every mutation that touches the
/// balance appends exactly one entry to the account's history, and every
/// mutation is validated before any field changes, so a failed operation
/// leaves the account as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    owner_name: String,
    kind: AccountKind,
    balance: Decimal,
    pin: Pin,
    blocked: bool,
    history: TransactionLog,
    created_at: DateTime<Utc>,
    last_activity_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a new account with zero balance and empty history
    pub fn new(
        id: AccountId,
        owner_name: impl Into<String>,
        pin: Pin,
        kind: AccountKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Account {
            id,
            owner_name: owner_name.into(),
            kind,
            balance: Decimal::ZERO,
            pin,
            blocked: false,
            history: TransactionLog::new(),
            created_at,
            last_activity_at: None,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn history(&self) -> &TransactionLog {
        &self.history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the latest history entry, `None` before the first one
    pub fn last_activity_at(&self) -> Option<DateTime<Utc>> {
        self.last_activity_at
    }

    pub fn verify_pin(&self, pin: Pin) -> bool {
        self.pin == pin
    }

    /// Deposit funds
    ///
    /// Savings accounts additionally earn interest on the balance after the
    /// deposit; the interest is recorded in the same history entry.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `AccountBlocked` if the account is blocked
    /// - `ArithmeticOverflow` if the new balance is not representable
    pub fn deposit(&mut self, amount: Decimal, at: DateTime<Utc>) -> Result<(), BankError> {
        ensure_positive(amount)?;
        self.ensure_active()?;

        let credited = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| BankError::arithmetic_overflow("deposit", self.id))?;

        let (new_balance, interest) = match self.kind {
            AccountKind::Savings => {
                let interest = credited
                    .checked_mul(SAVINGS_INTEREST_RATE)
                    .map(|i| i.round_dp(2))
                    .ok_or_else(|| BankError::arithmetic_overflow("interest", self.id))?;
                let with_interest = credited
                    .checked_add(interest)
                    .ok_or_else(|| BankError::arithmetic_overflow("interest", self.id))?;
                (with_interest, Some(interest))
            }
            AccountKind::Current => (credited, None),
        };

        self.balance = new_balance;
        self.record(EntryKind::Deposit { amount, interest }, at);
        Ok(())
    }

    /// Withdraw funds, subject to the account kind's balance rule
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `AccountBlocked` if the account is blocked
    /// - `InsufficientFunds` if the kind's rule would be broken
    pub fn withdraw(&mut self, amount: Decimal, at: DateTime<Utc>) -> Result<(), BankError> {
        self.debit(amount, EntryKind::Withdrawal { amount }, at)
    }

    /// Check that `amount` could be withdrawn right now without changing anything
    pub fn check_withdrawal(&self, amount: Decimal) -> Result<(), BankError> {
        ensure_positive(amount)?;
        self.ensure_active()?;

        let allowed = match self.kind {
            AccountKind::Savings => self.balance > amount,
            AccountKind::Current => self.balance - amount >= CURRENT_MINIMUM_BALANCE,
        };

        if allowed {
            Ok(())
        } else {
            Err(BankError::insufficient_funds(self.id, self.balance, amount))
        }
    }

    /// Debit under the withdrawal rule, recording `entry` instead of a plain withdrawal
    pub(crate) fn debit(
        &mut self,
        amount: Decimal,
        entry: EntryKind,
        at: DateTime<Utc>,
    ) -> Result<(), BankError> {
        self.check_withdrawal(amount)?;
        self.balance -= amount;
        self.record(entry, at);
        Ok(())
    }

    /// Plain credit without interest, used for the receiving side of a transfer
    pub(crate) fn credit(
        &mut self,
        amount: Decimal,
        entry: EntryKind,
        at: DateTime<Utc>,
    ) -> Result<(), BankError> {
        ensure_positive(amount)?;
        self.ensure_active()?;
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| BankError::arithmetic_overflow("transfer", self.id))?;
        self.record(entry, at);
        Ok(())
    }

    /// Replace the PIN; the caller has already passed authentication
    pub fn change_pin(&mut self, new_pin: Pin) -> Result<(), BankError> {
        self.ensure_active()?;
        self.pin = new_pin;
        Ok(())
    }

    /// Change the display name; the PIN is left untouched
    pub fn rename(&mut self, owner_name: impl Into<String>) {
        self.owner_name = owner_name.into();
    }

    pub fn block(&mut self) {
        self.blocked = true;
    }

    pub fn unblock(&mut self) {
        self.blocked = false;
    }

    /// Last `min(n, len)` history entries, `None` if there are none
    pub fn recent_history(&self, n: usize) -> Option<&[HistoryEntry]> {
        self.history.recent(n)
    }

    pub(crate) fn ensure_active(&self) -> Result<(), BankError> {
        if self.blocked {
            Err(BankError::account_blocked(self.id))
        } else {
            Ok(())
        }
    }

    fn record(&mut self, kind: EntryKind, at: DateTime<Utc>) {
        self.history.append(HistoryEntry::new(at, kind));
        self.last_activity_at = Some(at);
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), BankError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(BankError::invalid_amount(amount))
    }
}

/// Display data for one account
///
/// A detached copy: later changes to the store do not affect it.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub owner_name: String,
    pub kind: AccountKind,
    pub balance: Decimal,
    pub blocked: bool,
    pub created_at: DateTime<Utc>,
    /// `None` means "no transactions"
    pub last_activity_at: Option<DateTime<Utc>>,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        AccountSummary {
            id: account.id,
            owner_name: account.owner_name.clone(),
            kind: account.kind,
            balance: account.balance,
            blocked: account.blocked,
            created_at: account.created_at,
            last_activity_at: account.last_activity_at,
        }
    }
}
