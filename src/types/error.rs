//! Error types for the bank ledger
//!
//! This module defines all error types that can occur while operating on
//! accounts or replaying a command script. Every domain error is returned as a
//! value and leaves the affected accounts unchanged.
//!
//! # Error Categories
//!
//! - **Account Errors**: Invalid amounts, insufficient funds, unknown accounts
//! - **Authentication Errors**: Wrong PIN, blocked accounts, bad admin credentials
//! - **Script Errors**: File not found, malformed CSV rows, unknown commands

use super::account::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the bank ledger
///
/// Each variant includes the context needed to report the failure to the
/// account holder or administrator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    /// Amount was zero or negative
    #[error("Invalid amount {amount}: amount must be greater than zero")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Withdrawal would break the account kind's balance rule
    ///
    /// Savings accounts must keep a positive residual, Current accounts must
    /// keep the minimum balance. The account is left unchanged.
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account that was debited
        account: AccountId,
        /// Balance at the time of the request
        balance: Decimal,
        /// Requested withdrawal amount
        requested: Decimal,
    },

    /// No account with this identifier exists in the store
    #[error("Account {account} not found")]
    AccountNotFound {
        /// The identifier that could not be resolved
        account: AccountId,
    },

    /// PIN did not match
    #[error("Wrong PIN for account {account}, {attempts_left} attempt(s) left")]
    WrongPin {
        /// Account being authenticated
        account: AccountId,
        /// Remaining attempts in the current challenge
        attempts_left: u8,
    },

    /// Account is blocked and inert until an administrator unblocks it
    #[error("Account {account} is blocked")]
    AccountBlocked {
        /// The blocked account
        account: AccountId,
    },

    /// Administrative username or password did not match
    #[error("Invalid admin credentials")]
    InvalidCredentials,

    /// PIN is not a four digit number
    #[error("Invalid PIN '{value}': PIN must be 4 digits")]
    InvalidPin {
        /// The rejected input
        value: String,
    },

    /// Source and destination of a transfer are the same account
    #[error("Cannot transfer from account {account} to itself")]
    SameAccount {
        /// The account named on both sides
        account: AccountId,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account being updated
        account: AccountId,
    },

    /// Sum of all balances is not representable
    #[error("Arithmetic overflow in total balance")]
    TotalOverflow,

    /// Script file not found at the specified path
    ///
    /// This is a fatal error that prevents replay from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error - the malformed row is skipped
    /// and replay continues with the next command.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Script row names an unknown command or lacks a required field
    #[error("Invalid command '{command}': {reason}")]
    InvalidCommand {
        /// The command column as written
        command: String,
        /// Why the row was rejected
        reason: String,
    },

    /// Command needs a holder or admin session that is not active
    #[error("'{command}' requires an active {session} session")]
    SessionRequired {
        /// The command that was rejected
        command: String,
        /// Kind of session required ("account" or "admin")
        session: String,
    },
}

impl From<std::io::Error> for BankError {
    fn from(error: std::io::Error) -> Self {
        BankError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BankError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        BankError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl BankError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        BankError::InvalidAmount { amount }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: AccountId, balance: Decimal, requested: Decimal) -> Self {
        BankError::InsufficientFunds {
            account,
            balance,
            requested,
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: AccountId) -> Self {
        BankError::AccountNotFound { account }
    }

    /// Create a WrongPin error
    pub fn wrong_pin(account: AccountId, attempts_left: u8) -> Self {
        BankError::WrongPin {
            account,
            attempts_left,
        }
    }

    /// Create an AccountBlocked error
    pub fn account_blocked(account: AccountId) -> Self {
        BankError::AccountBlocked { account }
    }

    /// Create an InvalidPin error
    pub fn invalid_pin(value: impl ToString) -> Self {
        BankError::InvalidPin {
            value: value.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: AccountId) -> Self {
        BankError::ArithmeticOverflow {
            operation: operation.to_string(),
            account,
        }
    }

    /// Create an InvalidCommand error
    pub fn invalid_command(command: &str, reason: impl Into<String>) -> Self {
        BankError::InvalidCommand {
            command: command.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a SessionRequired error
    pub fn session_required(command: &str, session: &str) -> Self {
        BankError::SessionRequired {
            command: command.to_string(),
            session: session.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::invalid_amount(
        BankError::InvalidAmount { amount: Decimal::new(-5, 0) },
        "Invalid amount -5: amount must be greater than zero"
    )]
    #[case::insufficient_funds(
        BankError::InsufficientFunds { account: 200001, balance: Decimal::new(5000, 2), requested: Decimal::new(10000, 2) },
        "Insufficient funds in account 200001: balance 50.00, requested 100.00"
    )]
    #[case::account_not_found(
        BankError::AccountNotFound { account: 200042 },
        "Account 200042 not found"
    )]
    #[case::wrong_pin(
        BankError::WrongPin { account: 200001, attempts_left: 2 },
        "Wrong PIN for account 200001, 2 attempt(s) left"
    )]
    #[case::account_blocked(
        BankError::AccountBlocked { account: 200001 },
        "Account 200001 is blocked"
    )]
    #[case::invalid_credentials(BankError::InvalidCredentials, "Invalid admin credentials")]
    #[case::invalid_pin(
        BankError::InvalidPin { value: "12".to_string() },
        "Invalid PIN '12': PIN must be 4 digits"
    )]
    #[case::same_account(
        BankError::SameAccount { account: 200003 },
        "Cannot transfer from account 200003 to itself"
    )]
    #[case::arithmetic_overflow(
        BankError::arithmetic_overflow("deposit", 200001),
        "Arithmetic overflow in deposit for account 200001"
    )]
    #[case::total_overflow(BankError::TotalOverflow, "Arithmetic overflow in total balance")]
    #[case::parse_error_with_line(
        BankError::ParseError { line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        BankError::ParseError { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    #[case::session_required(
        BankError::SessionRequired { command: "deposit".to_string(), session: "account".to_string() },
        "'deposit' requires an active account session"
    )]
    fn test_error_display(#[case] error: BankError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::insufficient_funds(
        BankError::insufficient_funds(1, Decimal::new(5000, 2), Decimal::new(10000, 2)),
        BankError::InsufficientFunds { account: 1, balance: Decimal::new(5000, 2), requested: Decimal::new(10000, 2) }
    )]
    #[case::wrong_pin(
        BankError::wrong_pin(7, 1),
        BankError::WrongPin { account: 7, attempts_left: 1 }
    )]
    #[case::invalid_pin(
        BankError::invalid_pin(99999),
        BankError::InvalidPin { value: "99999".to_string() }
    )]
    #[case::invalid_command(
        BankError::invalid_command("fly", "unknown command"),
        BankError::InvalidCommand { command: "fly".to_string(), reason: "unknown command".to_string() }
    )]
    fn test_helper_functions(#[case] result: BankError, #[case] expected: BankError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: BankError = io_error.into();
        assert!(matches!(error, BankError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
