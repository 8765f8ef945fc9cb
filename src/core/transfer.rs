//! Funds transfer between two accounts
//!
//! A transfer debits the source under its withdrawal rule and only then
//! credits the destination. Every check that can fail runs before the debit,
//! and the credit cannot fail once the debit succeeded, so a transfer is
//! either fully applied or not applied at all.

use crate::core::account_store::AccountStore;
use crate::types::{AccountId, BankError, EntryKind};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Move `amount` from `source` to `destination`
///
/// Appends one history entry on each side naming the counterparty. The
/// destination receives a plain credit: Savings interest is only paid on
/// deposits.
///
/// # Errors
///
/// - `InvalidAmount` if `amount <= 0`
/// - `AccountNotFound` if either account is missing (destination checked first)
/// - `SameAccount` if both ids are equal
/// - `AccountBlocked` if either account is blocked
/// - `InsufficientFunds` if the source's withdrawal rule would be broken
/// - `ArithmeticOverflow` if the destination balance would overflow
pub fn transfer(
    store: &mut AccountStore,
    source: AccountId,
    destination: AccountId,
    amount: Decimal,
    at: DateTime<Utc>,
) -> Result<(), BankError> {
    if amount <= Decimal::ZERO {
        return Err(BankError::invalid_amount(amount));
    }
    if !store.contains(destination) {
        return Err(BankError::account_not_found(destination));
    }
    if !store.contains(source) {
        return Err(BankError::account_not_found(source));
    }
    if source == destination {
        return Err(BankError::SameAccount { account: source });
    }

    let (from, to) = store
        .pair_mut(source, destination)
        .ok_or_else(|| BankError::account_not_found(destination))?;

    to.ensure_active()?;
    from.check_withdrawal(amount)?;
    to.balance()
        .checked_add(amount)
        .ok_or_else(|| BankError::arithmetic_overflow("transfer", destination))?;

    from.debit(
        amount,
        EntryKind::TransferOut {
            amount,
            to: destination,
        },
        at,
    )?;
    to.credit(
        amount,
        EntryKind::TransferIn {
            amount,
            from: source,
        },
        at,
    )?;

    tracing::info!(
        source,
        destination,
        amount = %amount,
        "transfer completed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountKind, Pin};
    use chrono::TimeZone;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
    }

    fn open(store: &mut AccountStore, kind: AccountKind, deposit: i64) -> AccountId {
        let id = store.open("Holder", Pin::new(1234).unwrap(), kind, now());
        if deposit > 0 {
            store
                .find_mut(id)
                .unwrap()
                .deposit(Decimal::new(deposit, 0), now())
                .unwrap();
        }
        id
    }

    fn snapshot(store: &AccountStore, id: AccountId) -> (Decimal, usize) {
        let account = store.find(id).unwrap();
        (account.balance(), account.history().len())
    }

    #[test]
    fn test_transfer_into_full_destination_overflows() {
        let mut store = AccountStore::new();
        let a = open(&mut store, AccountKind::Current, 5000);
        let b = store.open("Holder", Pin::new(1234).unwrap(), AccountKind::Current, now());
        store
            .find_mut(b)
            .unwrap()
            .deposit(Decimal::MAX, now())
            .unwrap();
        let before = (snapshot(&store, a), snapshot(&store, b));

        assert_eq!(
            transfer(&mut store, a, b, Decimal::new(1500, 0), now()),
            Err(BankError::arithmetic_overflow("transfer", b))
        );
        assert_eq!((snapshot(&store, a), snapshot(&store, b)), before);
    }

    #[test]
    fn test_successful_transfer_moves_funds_and_records_both_sides() {
        let mut store = AccountStore::new();
        let a = open(&mut store, AccountKind::Current, 5000);
        let b = open(&mut store, AccountKind::Savings, 0);

        transfer(&mut store, a, b, Decimal::new(1500, 0), now()).unwrap();

        let from = store.find(a).unwrap();
        let to = store.find(b).unwrap();
        assert_eq!(from.balance(), Decimal::new(3500, 0));
        // No interest on incoming transfers, even for Savings
        assert_eq!(to.balance(), Decimal::new(1500, 0));
        assert_eq!(from.history().len(), 2);
        assert_eq!(to.history().len(), 1);
        assert_eq!(
            from.history().last().unwrap().kind(),
            &EntryKind::TransferOut {
                amount: Decimal::new(1500, 0),
                to: b,
            }
        );
        assert_eq!(
            to.history().last().unwrap().kind(),
            &EntryKind::TransferIn {
                amount: Decimal::new(1500, 0),
                from: a,
            }
        );
    }

    #[test]
    fn test_savings_source_obeys_positive_residual_rule() {
        let mut store = AccountStore::new();
        let a = open(&mut store, AccountKind::Savings, 100); // 102 with interest
        let b = open(&mut store, AccountKind::Current, 0);

        let result = transfer(&mut store, a, b, Decimal::new(102, 0), now());

        assert!(matches!(result, Err(BankError::InsufficientFunds { .. })));
        assert_eq!(snapshot(&store, a), (Decimal::new(102, 0), 1));
        assert_eq!(snapshot(&store, b), (Decimal::ZERO, 0));
    }

    #[test]
    fn test_current_source_obeys_minimum_balance() {
        let mut store = AccountStore::new();
        let a = open(&mut store, AccountKind::Current, 1200);
        let b = open(&mut store, AccountKind::Current, 0);

        let result = transfer(&mut store, a, b, Decimal::new(201, 0), now());

        assert!(matches!(result, Err(BankError::InsufficientFunds { .. })));
        assert_eq!(snapshot(&store, a), (Decimal::new(1200, 0), 1));
        assert_eq!(snapshot(&store, b), (Decimal::ZERO, 0));
    }

    #[rstest]
    #[case::zero_amount(Decimal::ZERO)]
    #[case::negative_amount(Decimal::new(-10, 0))]
    fn test_invalid_amount_changes_nothing(#[case] amount: Decimal) {
        let mut store = AccountStore::new();
        let a = open(&mut store, AccountKind::Current, 5000);
        let b = open(&mut store, AccountKind::Current, 0);

        assert_eq!(
            transfer(&mut store, a, b, amount, now()),
            Err(BankError::invalid_amount(amount))
        );
        assert_eq!(snapshot(&store, a), (Decimal::new(5000, 0), 1));
        assert_eq!(snapshot(&store, b), (Decimal::ZERO, 0));
    }

    #[test]
    fn test_unknown_destination() {
        let mut store = AccountStore::new();
        let a = open(&mut store, AccountKind::Current, 5000);

        assert_eq!(
            transfer(&mut store, a, 999, Decimal::ONE, now()),
            Err(BankError::account_not_found(999))
        );
        assert_eq!(snapshot(&store, a), (Decimal::new(5000, 0), 1));
    }

    #[test]
    fn test_self_transfer_is_rejected() {
        let mut store = AccountStore::new();
        let a = open(&mut store, AccountKind::Current, 5000);

        assert_eq!(
            transfer(&mut store, a, a, Decimal::ONE, now()),
            Err(BankError::SameAccount { account: a })
        );
        assert_eq!(snapshot(&store, a), (Decimal::new(5000, 0), 1));
    }

    #[rstest]
    #[case::blocked_source(true)]
    #[case::blocked_destination(false)]
    fn test_blocked_side_changes_nothing(#[case] block_source: bool) {
        let mut store = AccountStore::new();
        let a = open(&mut store, AccountKind::Current, 5000);
        let b = open(&mut store, AccountKind::Current, 0);
        let blocked = if block_source { a } else { b };
        store.find_mut(blocked).unwrap().block();

        assert_eq!(
            transfer(&mut store, a, b, Decimal::ONE, now()),
            Err(BankError::account_blocked(blocked))
        );
        assert_eq!(snapshot(&store, a), (Decimal::new(5000, 0), 1));
        assert_eq!(snapshot(&store, b), (Decimal::ZERO, 0));
    }
}
