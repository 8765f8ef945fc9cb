//! CSV format handling for command scripts and account reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - ScriptRecord structure for deserialization
//! - Conversion from script records to [`Command`]s
//! - Account report serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::core::SortOrder;
use crate::types::{AccountId, AccountKind, AccountSummary, BankError, Pin};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Header of the account report
pub const REPORT_HEADER: [&str; 7] = [
    "id",
    "name",
    "kind",
    "balance",
    "created",
    "last_activity",
    "blocked",
];

/// Marker written instead of a timestamp for accounts without history
pub const NO_TRANSACTIONS: &str = "No transactions";

/// CSV record structure for deserialization
///
/// Matches the script format with columns:
/// `command,account,name,pin,kind,amount,target,user,password`.
/// Only `command` is always required; which of the other columns must be
/// filled depends on the command.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct ScriptRecord {
    pub command: String,
    pub account: Option<String>,
    pub name: Option<String>,
    pub pin: Option<String>,
    pub kind: Option<String>,
    pub amount: Option<String>,
    pub target: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// One operation requested by a script line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open {
        name: String,
        pin: Pin,
        kind: AccountKind,
    },
    Login {
        account: AccountId,
        pin: Pin,
    },
    Logout,
    Balance,
    Deposit {
        amount: Decimal,
    },
    Withdraw {
        amount: Decimal,
    },
    Transfer {
        target: AccountId,
        amount: Decimal,
    },
    Statement {
        count: Option<usize>,
    },
    ChangePin {
        pin: Pin,
    },
    Close,
    Admin {
        user: String,
        password: String,
    },
    List,
    Find {
        account: AccountId,
    },
    Delete {
        account: AccountId,
    },
    Rename {
        account: AccountId,
        name: String,
    },
    ResetPin {
        account: AccountId,
        pin: Pin,
    },
    Block {
        account: AccountId,
    },
    Unblock {
        account: AccountId,
    },
    Total,
    Sort(SortOrder),
    Overview,
}

impl Command {
    /// Script keyword for this command
    pub fn name(&self) -> &'static str {
        match self {
            Command::Open { .. } => "open",
            Command::Login { .. } => "login",
            Command::Logout => "logout",
            Command::Balance => "balance",
            Command::Deposit { .. } => "deposit",
            Command::Withdraw { .. } => "withdraw",
            Command::Transfer { .. } => "transfer",
            Command::Statement { .. } => "statement",
            Command::ChangePin { .. } => "change_pin",
            Command::Close => "close",
            Command::Admin { .. } => "admin",
            Command::List => "list",
            Command::Find { .. } => "find",
            Command::Delete { .. } => "delete",
            Command::Rename { .. } => "rename",
            Command::ResetPin { .. } => "reset_pin",
            Command::Block { .. } => "block",
            Command::Unblock { .. } => "unblock",
            Command::Total => "total",
            Command::Sort(SortOrder::Name) => "sort_name",
            Command::Sort(SortOrder::BalanceDescending) => "sort_balance",
            Command::Sort(SortOrder::AccountNumber) => "sort_id",
            Command::Overview => "overview",
        }
    }
}

/// Convert a ScriptRecord to a Command
///
/// Parses the command keyword (case insensitive) and the fields that command
/// needs. Fields the command does not use are ignored.
///
/// # Errors
///
/// - `InvalidCommand` for an unknown keyword, a missing field or a malformed number
/// - `InvalidPin` if a PIN field is not four digits
pub fn convert_script_record(record: ScriptRecord) -> Result<Command, BankError> {
    let keyword = record.command.trim().to_lowercase();
    let fields = Fields {
        command: &keyword,
        record: &record,
    };

    let command = match keyword.as_str() {
        "open" => Command::Open {
            name: fields.text("name", &record.name)?,
            pin: fields.pin()?,
            kind: AccountKind::from_str(fields.required("kind", &record.kind)?)
                .map_err(|reason| BankError::invalid_command(&keyword, reason))?,
        },
        "login" => Command::Login {
            account: fields.account_id("account", &record.account)?,
            pin: fields.pin()?,
        },
        "logout" => Command::Logout,
        "balance" => Command::Balance,
        "deposit" => Command::Deposit {
            amount: fields.amount()?,
        },
        "withdraw" | "withdrawal" => Command::Withdraw {
            amount: fields.amount()?,
        },
        "transfer" => Command::Transfer {
            target: fields.account_id("target", &record.target)?,
            amount: fields.amount()?,
        },
        "statement" => Command::Statement {
            count: match present(&record.amount) {
                Some(value) => Some(value.parse::<usize>().map_err(|_| {
                    BankError::invalid_command(
                        &keyword,
                        format!("statement length '{}' is not a count", value),
                    )
                })?),
                None => None,
            },
        },
        "change_pin" => Command::ChangePin { pin: fields.pin()? },
        "close" => Command::Close,
        "admin" => Command::Admin {
            user: fields.text("user", &record.user)?,
            password: fields.text("password", &record.password)?,
        },
        "list" => Command::List,
        "find" => Command::Find {
            account: fields.account_id("account", &record.account)?,
        },
        "delete" => Command::Delete {
            account: fields.account_id("account", &record.account)?,
        },
        "rename" => Command::Rename {
            account: fields.account_id("account", &record.account)?,
            name: fields.text("name", &record.name)?,
        },
        "reset_pin" => Command::ResetPin {
            account: fields.account_id("account", &record.account)?,
            pin: fields.pin()?,
        },
        "block" => Command::Block {
            account: fields.account_id("account", &record.account)?,
        },
        "unblock" => Command::Unblock {
            account: fields.account_id("account", &record.account)?,
        },
        "total" => Command::Total,
        "sort_name" => Command::Sort(SortOrder::Name),
        "sort_balance" => Command::Sort(SortOrder::BalanceDescending),
        "sort_id" => Command::Sort(SortOrder::AccountNumber),
        "overview" => Command::Overview,
        _ => {
            return Err(BankError::invalid_command(
                record.command.trim(),
                "unknown command",
            ))
        }
    };

    Ok(command)
}

/// Trimmed, non-empty value of an optional column
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

struct Fields<'a> {
    command: &'a str,
    record: &'a ScriptRecord,
}

impl Fields<'_> {
    fn required<'v>(&self, column: &str, value: &'v Option<String>) -> Result<&'v str, BankError> {
        present(value).ok_or_else(|| {
            BankError::invalid_command(self.command, format!("missing {}", column))
        })
    }

    fn text(&self, column: &str, value: &Option<String>) -> Result<String, BankError> {
        self.required(column, value).map(str::to_string)
    }

    fn account_id(&self, column: &str, value: &Option<String>) -> Result<AccountId, BankError> {
        let raw = self.required(column, value)?;
        raw.parse::<AccountId>().map_err(|_| {
            BankError::invalid_command(
                self.command,
                format!("{} '{}' is not an account number", column, raw),
            )
        })
    }

    fn pin(&self) -> Result<Pin, BankError> {
        self.required("pin", &self.record.pin)?.parse::<Pin>()
    }

    fn amount(&self) -> Result<Decimal, BankError> {
        let raw = self.required("amount", &self.record.amount)?;
        Decimal::from_str(raw).map_err(|_| {
            BankError::invalid_command(self.command, format!("invalid amount '{}'", raw))
        })
    }
}

/// Write account summaries as the CSV report
///
/// Accounts are written in the order given, which is the store's current
/// iteration order. Balances have two decimal places.
///
/// # Errors
///
/// Returns `IoError` if the output cannot be written.
pub fn write_accounts_csv(
    accounts: &[AccountSummary],
    output: &mut dyn Write,
) -> Result<(), BankError> {
    use csv::Writer;

    let io_error = |context: &str, e: csv::Error| BankError::IoError {
        message: format!("Failed to write {}: {}", context, e),
    };

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(REPORT_HEADER)
        .map_err(|e| io_error("CSV header", e))?;

    for account in accounts {
        writer
            .write_record(&[
                account.id.to_string(),
                account.owner_name.clone(),
                account.kind.to_string(),
                format!("{:.2}", account.balance),
                account.created_at.format("%Y-%m-%d").to_string(),
                account
                    .last_activity_at
                    .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| NO_TRANSACTIONS.to_string()),
                account.blocked.to_string(),
            ])
            .map_err(|e| io_error("account record", e))?;
    }

    writer.flush()?;

    Ok(())
}
