//! Core business logic module
//!
//! This module contains the account-behavior components:
//! - `traits` - Time source abstraction
//! - `account_store` - Ownership, lookup, removal and ordering of accounts
//! - `auth` - PIN challenge state machine and session tokens
//! - `transfer` - Two-account funds transfer
//! - `bank` - Facade exposing holder and administrative operations

pub mod account_store;
pub mod auth;
pub mod bank;
pub mod traits;
pub mod transfer;

pub use account_store::{AccountStore, SortOrder, FIRST_ACCOUNT_ID};
pub use auth::{AdminToken, AuthState, AuthToken, PinChallenge, MAX_PIN_ATTEMPTS};
pub use bank::Bank;
pub use traits::{Clock, FixedClock, SystemClock};
pub use transfer::transfer;
