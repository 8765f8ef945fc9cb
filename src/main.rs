//! Bank Ledger CLI
//!
//! Replays a CSV command script against an in-memory bank.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- script.csv > accounts.csv
//! cargo run -- --admin-user ops --admin-password secret script.csv
//! RUST_LOG=debug cargo run -- script.csv
//! ```
//!
//! The final account report goes to stdout, log events to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success (rejected commands are logged, not fatal)
//! - 1: Error (script not found or not readable, report not writable)

use bank_ledger::{cli, logging, runner};
use std::process;

fn main() {
    let args = cli::parse_args();

    if let Err(e) = logging::init_logger(&args.log_level) {
        eprintln!("{}", e);
    }

    let config = args.to_bank_config();
    let mut output = std::io::stdout();
    if let Err(e) = runner::run_script_now(&args.script, &mut output, config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
