//! Bank Ledger Library
//! # Overview
//!
//! An in-memory ledger of bank accounts: per-kind deposit and withdrawal
//! rules, PIN authentication with lockout, and atomic two-account transfers.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, history entries, errors)
//! - [`core`] - Business logic components:
//!   - [`core::account_store`] - Ownership, lookup, removal and ordering of accounts
//!   - [`core::auth`] - PIN challenge with bounded retries and account blocking
//!   - [`core::transfer`] - Debit-then-credit transfer between two accounts
//!   - [`core::bank`] - Holder and administrative operations, reporting
//! - [`io`] - Command script parsing and report output
//! - [`runner`] - Script replay with session tracking
//! - [`cli`], [`config`], [`logging`] - Binary support
//!
//! # Account Kinds
//!
//! - **Savings**: every deposit earns 2% interest on the resulting balance; a
//!   withdrawal must leave a strictly positive balance
//! - **Current**: no interest; a withdrawal must leave at least 1000
//!
//! # Account State
//!
//! Each account maintains:
//! - `balance`: current funds
//! - `blocked`: set after three wrong PINs in one login, cleared by an administrator
//! - `history`: append-only log, one entry per balance change

pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod logging;
pub mod runner;
pub mod types;

pub use crate::core::{AccountStore, AdminToken, AuthToken, Bank, PinChallenge, SortOrder};
pub use config::{AdminCredentials, BankConfig};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountId, AccountKind, AccountSummary, BankError, EntryKind, HistoryEntry, Pin,
};
