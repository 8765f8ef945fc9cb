//! I/O module
//!
//! Handles command script parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, report serialization)
//! - `script_reader` - Streaming reader over a command script

pub mod csv_format;
pub mod script_reader;

pub use csv_format::{convert_script_record, write_accounts_csv, Command, ScriptRecord};
pub use script_reader::{ScriptLine, ScriptReader};
