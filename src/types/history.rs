//! Transaction history types
//!
//! Every balance-affecting operation on an account appends exactly one
//! [`HistoryEntry`] to that account's [`TransactionLog`]. Entries are never
//! edited, reordered or removed, so insertion order is chronological order.

use super::account::AccountId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// What a history entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Cash credited by the holder; Savings deposits carry the interest earned
    Deposit {
        amount: Decimal,
        interest: Option<Decimal>,
    },

    /// Cash debited by the holder
    Withdrawal { amount: Decimal },

    /// Debit leg of a transfer, naming the receiving account
    TransferOut { amount: Decimal, to: AccountId },

    /// Credit leg of a transfer, naming the sending account
    TransferIn { amount: Decimal, from: AccountId },
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Deposit {
                amount,
                interest: Some(interest),
            } => write!(f, "+ {:.2} Deposit (interest {:.2})", amount, interest),
            EntryKind::Deposit {
                amount,
                interest: None,
            } => write!(f, "+ {:.2} Deposit", amount),
            EntryKind::Withdrawal { amount } => write!(f, "- {:.2} Withdraw", amount),
            EntryKind::TransferOut { amount, to } => {
                write!(f, "- {:.2} Transfer to {}", amount, to)
            }
            EntryKind::TransferIn { amount, from } => {
                write!(f, "+ {:.2} Transfer from {}", amount, from)
            }
        }
    }
}

/// A single immutable record in an account's history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    timestamp: DateTime<Utc>,
    kind: EntryKind,
}

impl HistoryEntry {
    pub fn new(timestamp: DateTime<Utc>, kind: EntryKind) -> Self {
        HistoryEntry { timestamp, kind }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    /// Human readable description, e.g. `- 500.00 Withdraw`
    pub fn description(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.kind
        )
    }
}

/// Append-only, chronologically ordered history of one account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionLog {
    entries: Vec<HistoryEntry>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Last `min(n, len)` entries in chronological order
    ///
    /// Returns `None` when the log has no entries at all, so callers can report
    /// "no transactions" instead of printing an empty statement.
    pub fn recent(&self, n: usize) -> Option<&[HistoryEntry]> {
        if self.entries.is_empty() {
            return None;
        }
        let start = self.entries.len().saturating_sub(n);
        Some(&self.entries[start..])
    }
}
