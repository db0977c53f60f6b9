// Path: crates/test_utils/src/mocks/state.rs
use alloy_primitives::{Address, B256, U256};
use parking_lot::RwLock;
use std::collections::HashMap;
use tandem_api::state::StateDb;
use tandem_types::app::BalanceChangeReason;

/// A `StateDb` backed by hash maps.
///
/// Every balance credit is also appended to a journal so tests can assert on the
/// reason tag and ordering, not just the final balance.
#[derive(Debug, Default)]
pub struct MemoryState {
    slots: RwLock<HashMap<(Address, B256), B256>>,
    balances: RwLock<HashMap<Address, U256>>,
    credits: RwLock<Vec<(Address, U256, BalanceChangeReason)>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every credit applied so far, in order.
    pub fn credits(&self) -> Vec<(Address, U256, BalanceChangeReason)> {
        self.credits.read().clone()
    }

    /// Number of non-zero slots written under `namespace`.
    pub fn slot_count(&self, namespace: Address) -> usize {
        self.slots
            .read()
            .iter()
            .filter(|((ns, _), value)| *ns == namespace && !value.is_zero())
            .count()
    }
}

impl StateDb for MemoryState {
    fn get_state(&self, namespace: Address, slot: B256) -> B256 {
        self.slots
            .read()
            .get(&(namespace, slot))
            .copied()
            .unwrap_or_default()
    }

    fn set_state(&self, namespace: Address, slot: B256, value: B256) {
        self.slots.write().insert((namespace, slot), value);
    }

    fn add_balance(&self, account: Address, amount: U256, reason: BalanceChangeReason) {
        let mut balances = self.balances.write();
        let balance = balances.entry(account).or_default();
        *balance = balance.saturating_add(amount);
        self.credits.write().push((account, amount, reason));
    }

    fn balance(&self, account: Address) -> U256 {
        self.balances
            .read()
            .get(&account)
            .copied()
            .unwrap_or_default()
    }
}
