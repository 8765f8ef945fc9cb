use crate::config::{AdminCredentials, BankConfig, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USER};
use clap::Parser;
use std::path::PathBuf;

/// Replay a bank command script and print the final account report
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Replay a bank command script and print the final account report", long_about = None)]
pub struct CliArgs {
    /// Command script path
    #[arg(value_name = "SCRIPT", help = "Path to the CSV command script")]
    pub script: PathBuf,

    /// Administrative username
    #[arg(
        long = "admin-user",
        value_name = "USER",
        help = "Administrative username (default: admin)"
    )]
    pub admin_user: Option<String>,

    /// Administrative password
    #[arg(
        long = "admin-password",
        value_name = "PASSWORD",
        help = "Administrative password (default: admin123)"
    )]
    pub admin_password: Option<String>,

    /// Entries in a mini statement when the script gives no count
    #[arg(
        long = "statement-length",
        value_name = "COUNT",
        help = "Mini statement length when not given in the script (default: 10)"
    )]
    pub statement_length: Option<usize>,

    /// Log level used when RUST_LOG is not set
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "info",
        help = "Log level: error, warn, info, debug or trace (overridden by RUST_LOG)"
    )]
    pub log_level: String,
}

impl CliArgs {
    /// Create a BankConfig from CLI arguments
    ///
    /// Uses the provided values or falls back to the defaults.
    pub fn to_bank_config(&self) -> BankConfig {
        if self.admin_user.is_none()
            && self.admin_password.is_none()
            && self.statement_length.is_none()
        {
            return BankConfig::default();
        }

        let default = BankConfig::default();
        let admin = AdminCredentials::new(
            self.admin_user.as_deref().unwrap_or(DEFAULT_ADMIN_USER),
            self.admin_password
                .as_deref()
                .unwrap_or(DEFAULT_ADMIN_PASSWORD),
        );
        BankConfig::new(
            admin,
            self.statement_length.unwrap_or(default.statement_length),
        )
    }
}
