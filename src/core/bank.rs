//! Bank facade
//!
//! This module provides the `Bank` that ties together the account store, the
//! authentication gate and transfers, and exposes the operations an account
//! holder or administrator can perform.
//!
//! The bank enforces:
//! - Holder operations only with an [`AuthToken`] for the account
//! - Administrative operations only with an [`AdminToken`]
//! - Per-kind deposit and withdrawal rules on every path, transfers included
//! - No partial mutation: a failed operation leaves every account unchanged
//!
//! Every operation takes `&mut self`, so each one has exclusive access to the
//! accounts it touches for its whole duration.

use crate::config::BankConfig;
use crate::core::account_store::{AccountStore, SortOrder};
use crate::core::auth::{self, AdminToken, AuthToken, PinChallenge};
use crate::core::traits::{Clock, SystemClock};
use crate::core::transfer;
use crate::types::{Account, AccountId, AccountKind, AccountSummary, BankError, HistoryEntry, Pin};
use rust_decimal::Decimal;

/// In-memory bank
pub struct Bank {
    store: AccountStore,
    config: BankConfig,
    clock: Box<dyn Clock>,
}

impl Bank {
    /// Create an empty bank using the system clock
    pub fn new(config: BankConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Create an empty bank stamping times from `clock`
    pub fn with_clock(config: BankConfig, clock: Box<dyn Clock>) -> Self {
        Bank {
            store: AccountStore::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    /// Read-only view of the store
    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    /// Open a new account and return its identifier
    pub fn open_account(
        &mut self,
        owner_name: impl Into<String>,
        pin: Pin,
        kind: AccountKind,
    ) -> AccountId {
        let now = self.clock.now();
        let id = self.store.open(owner_name, pin, kind, now);
        tracing::info!(account = id, kind = %kind, "account opened");
        id
    }

    /// Brief listing of every account, available without authentication
    pub fn overview(&self) -> Vec<AccountSummary> {
        self.store.iter().map(AccountSummary::from).collect()
    }

    // Holder operations

    /// Start a PIN challenge for an account
    pub fn begin_login(&self, account: AccountId) -> Result<PinChallenge, BankError> {
        if !self.store.contains(account) {
            return Err(BankError::account_not_found(account));
        }
        Ok(PinChallenge::new(account))
    }

    /// Submit one PIN to a running challenge
    pub fn submit_pin(
        &mut self,
        challenge: &mut PinChallenge,
        pin: Pin,
    ) -> Result<AuthToken, BankError> {
        let result = challenge.submit(&mut self.store, pin);
        match &result {
            Ok(_) => tracing::info!(account = challenge.account(), "holder authenticated"),
            Err(e) => {
                tracing::debug!(account = challenge.account(), "authentication failed: {}", e)
            }
        }
        result
    }

    pub fn balance(&self, token: &AuthToken) -> Result<Decimal, BankError> {
        Ok(self.holder(token)?.balance())
    }

    /// Summary of the authenticated holder's account
    pub fn account_details(&self, token: &AuthToken) -> Result<AccountSummary, BankError> {
        self.holder(token).map(AccountSummary::from)
    }

    pub fn deposit(&mut self, token: &AuthToken, amount: Decimal) -> Result<Decimal, BankError> {
        let now = self.clock.now();
        let account = self.holder_mut(token)?;
        account.deposit(amount, now)?;
        tracing::debug!(account = account.id(), amount = %amount, "deposit");
        Ok(account.balance())
    }

    pub fn withdraw(&mut self, token: &AuthToken, amount: Decimal) -> Result<Decimal, BankError> {
        let now = self.clock.now();
        let account = self.holder_mut(token)?;
        account.withdraw(amount, now)?;
        tracing::debug!(account = account.id(), amount = %amount, "withdrawal");
        Ok(account.balance())
    }

    /// Transfer from the authenticated holder's account to `destination`
    pub fn transfer(
        &mut self,
        token: &AuthToken,
        destination: AccountId,
        amount: Decimal,
    ) -> Result<(), BankError> {
        let now = self.clock.now();
        transfer::transfer(&mut self.store, token.account(), destination, amount, now)
    }

    /// Last `n` history entries, or the configured statement length if `None`
    ///
    /// `Ok(None)` means the account has no transactions yet.
    pub fn mini_statement(
        &self,
        token: &AuthToken,
        n: Option<usize>,
    ) -> Result<Option<Vec<HistoryEntry>>, BankError> {
        let n = n
            .filter(|&n| n > 0)
            .unwrap_or(self.config.statement_length);
        Ok(self.holder(token)?.recent_history(n).map(<[_]>::to_vec))
    }

    pub fn change_pin(&mut self, token: &AuthToken, new_pin: Pin) -> Result<(), BankError> {
        self.holder_mut(token)?.change_pin(new_pin)?;
        tracing::info!(account = token.account(), "PIN changed");
        Ok(())
    }

    /// Close the authenticated holder's account, consuming the token
    pub fn close_account(&mut self, token: AuthToken) -> Result<(), BankError> {
        let id = token.account();
        if self.store.remove(id) {
            tracing::info!(account = id, "account closed by holder");
            Ok(())
        } else {
            Err(BankError::account_not_found(id))
        }
    }

    // Administrative operations

    pub fn admin_login(&self, username: &str, password: &str) -> Result<AdminToken, BankError> {
        let result = auth::admin_login(&self.config.admin, username, password);
        match &result {
            Ok(_) => tracing::info!("administrator logged in"),
            Err(_) => tracing::warn!(username, "rejected administrator login"),
        }
        result
    }

    /// Every account in current iteration order
    pub fn list_accounts(&self, _admin: &AdminToken) -> Vec<AccountSummary> {
        self.overview()
    }

    pub fn find_account(
        &self,
        _admin: &AdminToken,
        id: AccountId,
    ) -> Result<AccountSummary, BankError> {
        self.store
            .find(id)
            .map(AccountSummary::from)
            .ok_or_else(|| BankError::account_not_found(id))
    }

    pub fn delete_account(&mut self, _admin: &AdminToken, id: AccountId) -> Result<(), BankError> {
        if self.store.remove(id) {
            tracing::info!(account = id, "account deleted by administrator");
            Ok(())
        } else {
            Err(BankError::account_not_found(id))
        }
    }

    /// Change the owner name; the PIN is kept
    pub fn rename_account(
        &mut self,
        _admin: &AdminToken,
        id: AccountId,
        owner_name: impl Into<String>,
    ) -> Result<(), BankError> {
        self.account_mut(id)?.rename(owner_name);
        tracing::info!(account = id, "account renamed");
        Ok(())
    }

    pub fn reset_pin(
        &mut self,
        _admin: &AdminToken,
        id: AccountId,
        new_pin: Pin,
    ) -> Result<(), BankError> {
        self.account_mut(id)?.change_pin(new_pin)?;
        tracing::info!(account = id, "PIN reset by administrator");
        Ok(())
    }

    pub fn block_account(&mut self, _admin: &AdminToken, id: AccountId) -> Result<(), BankError> {
        self.account_mut(id)?.block();
        tracing::info!(account = id, "account blocked by administrator");
        Ok(())
    }

    pub fn unblock_account(
        &mut self,
        _admin: &AdminToken,
        id: AccountId,
    ) -> Result<(), BankError> {
        self.account_mut(id)?.unblock();
        tracing::info!(account = id, "account unblocked by administrator");
        Ok(())
    }

    pub fn total_balance(&self, _admin: &AdminToken) -> Result<Decimal, BankError> {
        self.store.total_balance()
    }

    pub fn sort_accounts(&mut self, _admin: &AdminToken, order: SortOrder) {
        self.store.sort(order);
        tracing::debug!(?order, "accounts sorted");
    }

    fn holder(&self, token: &AuthToken) -> Result<&Account, BankError> {
        self.store
            .find(token.account())
            .ok_or_else(|| BankError::account_not_found(token.account()))
    }

    fn holder_mut(&mut self, token: &AuthToken) -> Result<&mut Account, BankError> {
        self.account_mut(token.account())
    }

    fn account_mut(&mut self, id: AccountId) -> Result<&mut Account, BankError> {
        self.store
            .find_mut(id)
            .ok_or_else(|| BankError::account_not_found(id))
    }
}

impl Default for Bank {
    fn default() -> Self {
        Self::new(BankConfig::default())
    }
}
