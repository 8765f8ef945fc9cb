//! Command script reader with iterator interface
//!
//! Provides a streaming iterator over the commands of a CSV script.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `open()`
//! - Malformed rows are yielded as `Err` values tagged with their line number,
//!   so the caller can report them and carry on with the next command
//!
//! ```no_run
//! use bank_ledger::io::ScriptReader;
//! use std::path::Path;
//!
//! let reader = ScriptReader::open(Path::new("script.csv")).unwrap();
//! for line in reader {
//!     match line.command {
//!         Ok(command) => println!("line {}: {}", line.number, command.name()),
//!         Err(e) => eprintln!("line {}: {}", line.number, e),
//!     }
//! }
//! ```

use crate::io::csv_format::{convert_script_record, Command, ScriptRecord};
use crate::types::BankError;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One script row, parsed or not
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    /// 1-based physical line number in the script, header and blank lines included
    pub number: u64,
    pub command: Result<Command, BankError>,
}

/// Streaming command script reader
///
/// Reads one row at a time, so memory use does not grow with script length.
#[derive(Debug)]
pub struct ScriptReader<R: Read = File> {
    reader: csv::Reader<R>,
    headers: Option<StringRecord>,
    record: StringRecord,
    line_num: u64,
}

impl ScriptReader<File> {
    /// Open a script file
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if nothing exists at `path`
    /// - `IoError` for any other failure to open it
    pub fn open(path: &Path) -> Result<Self, BankError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BankError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => BankError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), e),
            },
        })?;

        Ok(Self::from_reader(file))
    }
}

impl<R: Read> ScriptReader<R> {
    /// Read a script from any source
    ///
    /// The CSV reader is configured to trim whitespace from all fields and to
    /// accept rows with fewer columns than the header.
    pub fn from_reader(source: R) -> Self {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            reader,
            headers: None,
            record: StringRecord::new(),
            line_num: 1,
        }
    }
}

impl<R: Read> ScriptReader<R> {
    fn parse_error(&mut self, error: csv::Error) -> ScriptLine {
        self.line_num = error
            .position()
            .map_or(self.line_num + 1, |position| position.line());

        ScriptLine {
            number: self.line_num,
            command: Err(BankError::ParseError {
                line: Some(self.line_num),
                message: error.to_string(),
            }),
        }
    }
}

impl<R: Read> Iterator for ScriptReader<R> {
    type Item = ScriptLine;

    fn next(&mut self) -> Option<Self::Item> {
        if self.headers.is_none() {
            match self.reader.headers() {
                Ok(headers) => self.headers = Some(headers.clone()),
                Err(e) => {
                    // Rows after an unreadable header fail to deserialize on their own
                    self.headers = Some(StringRecord::new());
                    return Some(self.parse_error(e));
                }
            }
        }

        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                self.line_num = self
                    .record
                    .position()
                    .map_or(self.line_num + 1, |position| position.line());

                let command = self
                    .record
                    .deserialize::<ScriptRecord>(self.headers.as_ref())
                    .map_err(|e| BankError::ParseError {
                        line: Some(self.line_num),
                        message: e.to_string(),
                    })
                    .and_then(convert_script_record);

                Some(ScriptLine {
                    number: self.line_num,
                    command,
                })
            }
            Err(e) => Some(self.parse_error(e)),
        }
    }
}
