//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account entity, account kinds, PINs and display summaries
//! - `history`: Per-account transaction history
//! - `error`: Error types for the bank ledger

pub mod account;
pub mod error;
pub mod history;

pub use account::{
    Account, AccountId, AccountKind, AccountSummary, Pin, CURRENT_MINIMUM_BALANCE,
    SAVINGS_INTEREST_RATE,
};
pub use error::BankError;
pub use history::{EntryKind, HistoryEntry, TransactionLog};
