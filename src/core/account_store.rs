//! Account store module
//!
//! This module provides the `AccountStore` which exclusively owns every
//! account in the bank.
//!
//! The AccountStore is responsible for:
//! - Allocating account identifiers (monotonic, never reused)
//! - Creating and permanently removing accounts
//! - Lookup by identifier
//! - Maintaining the iteration order used for listings and the three sort modes
//!
//! # Layout
//!
//! Accounts live in a map keyed by identifier, so lookup is O(1). The iteration
//! order is a separate `Vec` of identifiers; sorting reorders that vector and
//! never touches the accounts themselves.

use crate::types::{Account, AccountId, AccountKind, BankError, Pin};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;

/// First identifier handed out by a fresh store
pub const FIRST_ACCOUNT_ID: AccountId = 200001;

/// Iteration orders supported by [`AccountStore::sort`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Owner name ascending
    Name,
    /// Balance descending
    BalanceDescending,
    /// Account identifier ascending
    AccountNumber,
}

/// Owns all accounts and their iteration order
#[derive(Debug, Clone)]
pub struct AccountStore {
    /// Map of identifiers to accounts
    accounts: HashMap<AccountId, Account>,
    /// Iteration order; always holds exactly the keys of `accounts`
    order: Vec<AccountId>,
    /// Next identifier to allocate, independent of removals
    next_id: AccountId,
}

impl AccountStore {
    /// Create an empty store whose first account gets [`FIRST_ACCOUNT_ID`]
    pub fn new() -> Self {
        AccountStore {
            accounts: HashMap::new(),
            order: Vec::new(),
            next_id: FIRST_ACCOUNT_ID,
        }
    }

    /// Open a new account
    ///
    /// Allocates the next identifier, registers a zero-balance account of the
    /// requested kind at the end of the iteration order and returns its id.
    pub fn open(
        &mut self,
        owner_name: impl Into<String>,
        pin: Pin,
        kind: AccountKind,
        created_at: DateTime<Utc>,
    ) -> AccountId {
        let id = self.next_id;
        self.next_id += 1;

        self.accounts
            .insert(id, Account::new(id, owner_name, pin, kind, created_at));
        self.order.push(id);
        id
    }

    /// Look up an account by identifier
    pub fn find(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    /// Look up an account for mutation
    pub fn find_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(&id)
    }

    pub fn contains(&self, id: AccountId) -> bool {
        self.accounts.contains_key(&id)
    }

    /// Permanently delete an account and its history
    ///
    /// Returns whether an account existed. The identifier is never handed out
    /// again.
    pub fn remove(&mut self, id: AccountId) -> bool {
        if self.accounts.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|&existing| existing != id);
        true
    }

    /// Reorder iteration with a stable sort; ties keep their relative order
    pub fn sort(&mut self, order: SortOrder) {
        let accounts = &self.accounts;
        self.order.sort_by(|a, b| {
            // Every id in `order` is a key of `accounts`
            match (accounts.get(a), accounts.get(b)) {
                (Some(a), Some(b)) => compare(order, a, b),
                _ => Ordering::Equal,
            }
        });
    }

    pub fn sort_by_name(&mut self) {
        self.sort(SortOrder::Name);
    }

    pub fn sort_by_balance_descending(&mut self) {
        self.sort(SortOrder::BalanceDescending);
    }

    pub fn sort_by_account_number(&mut self) {
        self.sort(SortOrder::AccountNumber);
    }

    /// Sum of every account's current balance
    ///
    /// # Errors
    ///
    /// `TotalOverflow` if the sum is not representable as a `Decimal`.
    pub fn total_balance(&self) -> Result<Decimal, BankError> {
        self.accounts
            .values()
            .try_fold(Decimal::ZERO, |total, account| {
                total.checked_add(account.balance())
            })
            .ok_or(BankError::TotalOverflow)
    }

    /// Accounts in iteration order, borrowed
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.order.iter().filter_map(|id| self.accounts.get(id))
    }

    /// Snapshot of every account in iteration order
    ///
    /// The returned accounts are copies; changing the store afterwards does
    /// not affect them.
    pub fn all(&self) -> Vec<Account> {
        self.iter().cloned().collect()
    }

    /// Identifiers in iteration order
    pub fn ids(&self) -> &[AccountId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Mutable access to two distinct accounts at once
    ///
    /// Returns `None` if either id is missing or both ids are equal.
    pub(crate) fn pair_mut(
        &mut self,
        first: AccountId,
        second: AccountId,
    ) -> Option<(&mut Account, &mut Account)> {
        if first == second {
            return None;
        }
        let [a, b] = self.accounts.get_disjoint_mut([&first, &second]);
        Some((a?, b?))
    }
}

fn compare(order: SortOrder, a: &Account, b: &Account) -> Ordering {
    match order {
        SortOrder::Name => a.owner_name().cmp(b.owner_name()),
        SortOrder::BalanceDescending => b.balance().cmp(&a.balance()),
        SortOrder::AccountNumber => a.id().cmp(&b.id()),
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
    }

    fn pin() -> Pin {
        Pin::new(1234).unwrap()
    }

    /// Store with accounts opened in order, each funded with the given deposit
    fn store_with(accounts: &[(&str, AccountKind, i64)]) -> (AccountStore, Vec<AccountId>) {
        let mut store = AccountStore::new();
        let ids = accounts
            .iter()
            .map(|&(name, kind, deposit)| {
                let id = store.open(name, pin(), kind, now());
                if deposit > 0 {
                    store
                        .find_mut(id)
                        .unwrap()
                        .deposit(Decimal::new(deposit, 0), now())
                        .unwrap();
                }
                id
            })
            .collect();
        (store, ids)
    }

    #[test]
    fn test_new_creates_empty_store() {
        let store = AccountStore::new();
        assert!(store.is_empty());
        assert_eq!(store.all().len(), 0);
        assert_eq!(store.total_balance(), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_open_assigns_sequential_ids() {
        let mut store = AccountStore::new();

        let first = store.open("Alice", pin(), AccountKind::Savings, now());
        let second = store.open("Bob", pin(), AccountKind::Current, now());

        assert_eq!(first, FIRST_ACCOUNT_ID);
        assert_eq!(second, FIRST_ACCOUNT_ID + 1);

        let account = store.find(second).unwrap();
        assert_eq!(account.owner_name(), "Bob");
        assert_eq!(account.kind(), AccountKind::Current);
        assert_eq!(account.balance(), Decimal::ZERO);
        assert!(account.history().is_empty());
    }

    #[test]
    fn test_find_unknown_id_returns_none() {
        let (store, _) = store_with(&[("Alice", AccountKind::Savings, 0)]);
        assert!(store.find(1).is_none());
    }

    #[test]
    fn test_remove_deletes_and_never_reuses_id() {
        let (mut store, ids) = store_with(&[
            ("Alice", AccountKind::Savings, 0),
            ("Bob", AccountKind::Current, 0),
        ]);

        assert!(store.remove(ids[1]));
        assert!(store.find(ids[1]).is_none());
        assert!(!store.remove(ids[1]));
        assert_eq!(store.ids(), &[ids[0]]);

        let next = store.open("Carol", pin(), AccountKind::Savings, now());
        assert_ne!(next, ids[1]);
        assert_eq!(next, ids[1] + 1);
    }

    #[test]
    fn test_remove_unknown_returns_false() {
        let mut store = AccountStore::new();
        assert!(!store.remove(FIRST_ACCOUNT_ID));
    }

    #[rstest]
    #[case::by_name(SortOrder::Name, vec![1, 3, 0, 2])]
    #[case::by_balance_descending(SortOrder::BalanceDescending, vec![3, 1, 0, 2])]
    #[case::by_account_number(SortOrder::AccountNumber, vec![0, 1, 2, 3])]
    fn test_sort_orders(#[case] order: SortOrder, #[case] expected_positions: Vec<usize>) {
        let (mut store, ids) = store_with(&[
            ("Dave", AccountKind::Current, 1500),
            ("Alice", AccountKind::Current, 2000),
            ("Erin", AccountKind::Current, 1200),
            ("Bob", AccountKind::Current, 3000),
        ]);
        let total_before = store.total_balance().unwrap();

        store.sort(order);

        let expected: Vec<AccountId> = expected_positions.iter().map(|&i| ids[i]).collect();
        assert_eq!(store.ids(), expected.as_slice());
        assert_eq!(store.len(), 4);
        assert_eq!(store.total_balance(), Ok(total_before));
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let (mut store, ids) = store_with(&[
            ("Sam", AccountKind::Current, 1000),
            ("Ann", AccountKind::Current, 1000),
            ("Sam", AccountKind::Current, 2000),
            ("Ann", AccountKind::Current, 1000),
        ]);

        store.sort_by_balance_descending();
        assert_eq!(store.ids(), &[ids[2], ids[0], ids[1], ids[3]]);

        store.sort_by_name();
        // Ann accounts keep their balance-order positions, then the Sams
        assert_eq!(store.ids(), &[ids[1], ids[3], ids[2], ids[0]]);

        store.sort_by_account_number();
        assert_eq!(store.ids(), ids.as_slice());
    }

    #[test]
    fn test_total_balance_sums_all_accounts() {
        let (store, _) = store_with(&[
            ("Alice", AccountKind::Savings, 1000),
            ("Bob", AccountKind::Current, 1500),
        ]);
        // 1020 savings (with interest) + 1500 current
        assert_eq!(store.total_balance(), Ok(Decimal::new(2520, 0)));
    }

    #[test]
    fn test_total_balance_overflow_is_an_error() {
        let half_of_max = Decimal::from_str_exact("50000000000000000000000000000").unwrap();
        let (mut store, ids) = store_with(&[
            ("Alice", AccountKind::Current, 0),
            ("Bob", AccountKind::Current, 0),
        ]);
        for id in &ids {
            store
                .find_mut(*id)
                .unwrap()
                .deposit(half_of_max, now())
                .unwrap();
        }

        assert_eq!(store.total_balance(), Err(BankError::TotalOverflow));
        for id in &ids {
            assert_eq!(store.find(*id).unwrap().balance(), half_of_max);
        }
    }

    #[test]
    fn test_all_returns_detached_snapshot() {
        let (mut store, ids) = store_with(&[
            ("Alice", AccountKind::Current, 1500),
            ("Bob", AccountKind::Current, 1200),
        ]);

        let snapshot = store.all();
        store.remove(ids[0]);
        store
            .find_mut(ids[1])
            .unwrap()
            .deposit(Decimal::new(100, 0), now())
            .unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id(), ids[0]);
        assert_eq!(snapshot[1].balance(), Decimal::new(1200, 0));
    }

    #[test]
    fn test_pair_mut_requires_distinct_existing_ids() {
        let (mut store, ids) = store_with(&[
            ("Alice", AccountKind::Current, 0),
            ("Bob", AccountKind::Current, 0),
        ]);

        assert!(store.pair_mut(ids[0], ids[0]).is_none());
        assert!(store.pair_mut(ids[0], 1).is_none());

        let (a, b) = store.pair_mut(ids[0], ids[1]).unwrap();
        assert_eq!(a.id(), ids[0]);
        assert_eq!(b.id(), ids[1]);
    }
}
