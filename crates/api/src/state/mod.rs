// Path: crates/api/src/state/mod.rs
//! Defines the `StateDb` trait, the narrow slice of the state engine this core uses.

use alloy_primitives::{Address, B256, U256};
use std::sync::Arc;
use tandem_types::app::BalanceChangeReason;

/// Slot-addressed storage plus balance credits.
///
/// Methods take `&self`; implementations provide their own interior mutability so that
/// the incentive ledger can serialize writers per identity rather than per store.
/// An unwritten slot reads as zero.
pub trait StateDb: Send + Sync {
    /// Reads the 32-byte word stored at `slot` under `namespace`.
    fn get_state(&self, namespace: Address, slot: B256) -> B256;

    /// Overwrites the word stored at `slot` under `namespace`.
    fn set_state(&self, namespace: Address, slot: B256, value: B256);

    /// Credits `amount` to `account`.
    fn add_balance(&self, account: Address, amount: U256, reason: BalanceChangeReason);

    /// Current balance of `account`.
    fn balance(&self, account: Address) -> U256;
}

impl<T: StateDb + ?Sized> StateDb for &T {
    fn get_state(&self, namespace: Address, slot: B256) -> B256 {
        (**self).get_state(namespace, slot)
    }

    fn set_state(&self, namespace: Address, slot: B256, value: B256) {
        (**self).set_state(namespace, slot, value)
    }

    fn add_balance(&self, account: Address, amount: U256, reason: BalanceChangeReason) {
        (**self).add_balance(account, amount, reason)
    }

    fn balance(&self, account: Address) -> U256 {
        (**self).balance(account)
    }
}

impl<T: StateDb + ?Sized> StateDb for Arc<T> {
    fn get_state(&self, namespace: Address, slot: B256) -> B256 {
        (**self).get_state(namespace, slot)
    }

    fn set_state(&self, namespace: Address, slot: B256, value: B256) {
        (**self).set_state(namespace, slot, value)
    }

    fn add_balance(&self, account: Address, amount: U256, reason: BalanceChangeReason) {
        (**self).add_balance(account, amount, reason)
    }

    fn balance(&self, account: Address) -> U256 {
        (**self).balance(account)
    }
}
