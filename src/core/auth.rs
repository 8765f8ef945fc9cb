//! Authentication gate
//!
//! Account holders authenticate with a PIN challenge: up to three attempts in
//! one challenge, after which the account is blocked until an administrator
//! unblocks it. The block is stored on the account itself, so it outlives the
//! challenge that caused it; the attempt counter does not.
//!
//! Successful authentication yields a token that the bank facade requires
//! for holder or administrative operations. Tokens can only be created here.
//!
//! ```text
//! Active --submit--> Challenging(n) --match--> Authenticated
//!                         |  mismatch, n + 1 < 3 -> Challenging(n + 1)
//!                         `- third mismatch     -> Blocked (account.blocked = true)
//! ```

use crate::config::AdminCredentials;
use crate::core::account_store::AccountStore;
use crate::types::{AccountId, BankError, Pin};

/// Consecutive wrong PINs tolerated in one challenge before blocking
pub const MAX_PIN_ATTEMPTS: u8 = 3;

/// Proof that the holder of an account passed a PIN challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    account: AccountId,
}

impl AuthToken {
    pub fn account(&self) -> AccountId {
        self.account
    }
}

/// Proof that the administrative credentials were presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminToken {
    _private: (),
}

/// Where a challenge currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No PIN submitted yet
    Active,
    /// `failures` wrong PINs submitted so far
    Challenging { failures: u8 },
    /// The account is blocked; every further submission is rejected
    Blocked,
    Authenticated,
}

/// One login attempt sequence against a single account
#[derive(Debug, Clone)]
pub struct PinChallenge {
    account: AccountId,
    state: AuthState,
}

impl PinChallenge {
    pub fn new(account: AccountId) -> Self {
        PinChallenge {
            account,
            state: AuthState::Active,
        }
    }

    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Attempts remaining before the account is blocked
    pub fn attempts_left(&self) -> u8 {
        match self.state {
            AuthState::Challenging { failures } => MAX_PIN_ATTEMPTS - failures,
            AuthState::Blocked => 0,
            AuthState::Active | AuthState::Authenticated => MAX_PIN_ATTEMPTS,
        }
    }

    /// Submit one PIN
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the account no longer exists
    /// - `AccountBlocked` if the account is blocked; no attempt is consumed
    /// - `WrongPin` with the attempts left for each mismatch. The third
    ///   consecutive one reports zero and blocks the account.
    pub fn submit(&mut self, store: &mut AccountStore, pin: Pin) -> Result<AuthToken, BankError> {
        let account = store
            .find_mut(self.account)
            .ok_or_else(|| BankError::account_not_found(self.account))?;

        if self.state == AuthState::Blocked || account.is_blocked() {
            self.state = AuthState::Blocked;
            return Err(BankError::account_blocked(self.account));
        }

        if account.verify_pin(pin) {
            self.state = AuthState::Authenticated;
            return Ok(AuthToken {
                account: self.account,
            });
        }

        let failures = match self.state {
            AuthState::Challenging { failures } => failures + 1,
            _ => 1,
        };

        if failures >= MAX_PIN_ATTEMPTS {
            account.block();
            self.state = AuthState::Blocked;
            tracing::warn!(
                account = self.account,
                "account blocked after {} failed PIN attempts",
                MAX_PIN_ATTEMPTS
            );
        } else {
            self.state = AuthState::Challenging { failures };
        }

        Err(BankError::wrong_pin(self.account, MAX_PIN_ATTEMPTS.saturating_sub(failures)))
    }
}

/// Check the administrative credential pair
pub fn admin_login(
    credentials: &AdminCredentials,
    username: &str,
    password: &str,
) -> Result<AdminToken, BankError> {
    if credentials.matches(username, password) {
        Ok(AdminToken { _private: () })
    } else {
        Err(BankError::InvalidCredentials)
    }
}
