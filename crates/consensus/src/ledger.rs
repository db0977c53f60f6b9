// Path: crates/consensus/src/ledger.rs
//! The per-validator incentive ledger.
//!
//! Each validator record lives in three storage slots of one shared namespace. The
//! slot of a field is derived from `(identity, field index)` by a versioned
//! [`SlotPolicy`], so the layout can be replaced without touching the ledger logic.

use std::fmt::Debug;
use std::sync::Arc;

use alloy_primitives::{keccak256, Address, B256};
use dashmap::DashMap;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use parking_lot::Mutex;
use tandem_api::state::StateDb;
use tandem_types::app::{RecordField, ValidatorRecord};
use tandem_types::config::LedgerStorageConfig;
use tandem_types::error::{ConfigError, LedgerError};
use tracing::debug;

/// Maps a record field of a validator to its storage slot.
pub trait SlotPolicy: Send + Sync + Debug {
    /// Layout version, as named in configuration.
    fn version(&self) -> u8;

    /// The storage namespace every slot lives in.
    fn namespace(&self) -> Address;

    /// The slot of `field` for `identity`. Must be injective over the pair.
    fn slot(&self, identity: Address, field: RecordField) -> B256;
}

/// Layout version 1: `keccak256(identity ‖ field_index)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeccakSlotPolicy {
    namespace: Address,
}

impl KeccakSlotPolicy {
    pub const VERSION: u8 = 1;

    pub fn new(namespace: Address) -> Self {
        Self { namespace }
    }
}

impl SlotPolicy for KeccakSlotPolicy {
    fn version(&self) -> u8 {
        Self::VERSION
    }

    fn namespace(&self) -> Address {
        self.namespace
    }

    fn slot(&self, identity: Address, field: RecordField) -> B256 {
        let mut preimage = identity.to_vec();
        preimage.push(field.index());
        keccak256(preimage)
    }
}

/// Resolves the configured layout version to a policy.
pub fn slot_policy_from_config(
    config: &LedgerStorageConfig,
) -> Result<Arc<dyn SlotPolicy>, ConfigError> {
    match config.slot_layout {
        KeccakSlotPolicy::VERSION => Ok(Arc::new(KeccakSlotPolicy::new(config.namespace))),
        other => Err(ConfigError::UnsupportedSlotLayout(other)),
    }
}

/// The largest value a slot can hold, `2^256 - 1`.
pub fn slot_max() -> BigUint {
    (BigUint::one() << 256u32) - BigUint::one()
}

fn encode_word(field: RecordField, value: &BigUint) -> Result<B256, LedgerError> {
    let bits = value.bits();
    if bits > 256 {
        return Err(LedgerError::ValueOverflow { field, bits });
    }
    if value.is_zero() {
        return Ok(B256::ZERO);
    }
    Ok(B256::left_padding_from(&value.to_bytes_be()))
}

fn decode_word(word: B256) -> BigUint {
    BigUint::from_bytes_be(word.as_slice())
}

/// Validator records on top of a [`StateDb`], with writers serialized per identity.
#[derive(Debug)]
pub struct IncentiveLedger {
    policy: Arc<dyn SlotPolicy>,
    locks: DashMap<Address, Arc<Mutex<()>>>,
}

impl IncentiveLedger {
    pub fn new(policy: Arc<dyn SlotPolicy>) -> Self {
        Self {
            policy,
            locks: DashMap::new(),
        }
    }

    pub fn policy(&self) -> &dyn SlotPolicy {
        self.policy.as_ref()
    }

    /// Runs `f` while holding the lock of `identity`.
    ///
    /// A lock lives in the map only while someone holds or waits on it, so the map is
    /// bounded by the number of concurrent writers rather than by every identity seen.
    fn with_lock<T>(&self, identity: Address, f: impl FnOnce() -> T) -> T {
        let lock = self.locks.entry(identity).or_default().value().clone();
        let out = {
            let _guard = lock.lock();
            f()
        };
        drop(lock);
        self.locks
            .remove_if(&identity, |_, lock| Arc::strong_count(lock) == 1);
        out
    }

    /// Identities whose lock is currently held or awaited.
    pub fn locked_identities(&self) -> usize {
        self.locks.len()
    }

    fn read_field(&self, state: &dyn StateDb, identity: Address, field: RecordField) -> BigUint {
        let slot = self.policy.slot(identity, field);
        decode_word(state.get_state(self.policy.namespace(), slot))
    }

    /// The record of `identity`. A record never written reads as all-zero.
    pub fn get(&self, state: &dyn StateDb, identity: Address) -> ValidatorRecord {
        ValidatorRecord {
            delegated_stake: self.read_field(state, identity, RecordField::DelegatedStake),
            liquidity_stake: self.read_field(state, identity, RecordField::LiquidityStake),
            total_rewards: self.read_field(state, identity, RecordField::TotalRewards),
        }
    }

    /// The delegated stake of `identity`.
    pub fn delegated_stake(&self, state: &dyn StateDb, identity: Address) -> BigUint {
        self.read_field(state, identity, RecordField::DelegatedStake)
    }

    fn write(
        &self,
        state: &dyn StateDb,
        identity: Address,
        record: &ValidatorRecord,
    ) -> Result<(), LedgerError> {
        // Encode all three words before the first write so an overflow leaves no trace.
        let mut words = Vec::with_capacity(RecordField::ALL.len());
        for field in RecordField::ALL {
            words.push((field, encode_word(field, record.field(field))?));
        }
        let namespace = self.policy.namespace();
        for (field, word) in words {
            state.set_state(namespace, self.policy.slot(identity, field), word);
        }
        Ok(())
    }

    /// Overwrites all three fields of the record.
    pub fn set(
        &self,
        state: &dyn StateDb,
        identity: Address,
        record: &ValidatorRecord,
    ) -> Result<(), LedgerError> {
        self.with_lock(identity, || self.write(state, identity, record))
    }

    /// Runs a read-modify-write of one record under that identity's lock.
    ///
    /// If `f` fails, or the modified record does not fit its slots, nothing is written.
    pub fn update<T, E, F>(&self, state: &dyn StateDb, identity: Address, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut ValidatorRecord) -> Result<T, E>,
        E: From<LedgerError>,
    {
        self.with_lock(identity, || {
            let mut record = self.get(state, identity);
            let out = f(&mut record)?;
            self.write(state, identity, &record)?;
            Ok(out)
        })
    }

    pub fn add_delegation(
        &self,
        state: &dyn StateDb,
        identity: Address,
        amount: &BigUint,
    ) -> Result<(), LedgerError> {
        self.update(state, identity, |record| {
            record.delegated_stake += amount;
            Ok::<_, LedgerError>(())
        })?;
        debug!(target: "ledger", %identity, %amount, "Delegation added");
        Ok(())
    }

    /// Fails with `InsufficientDelegation`, leaving the record untouched, if `amount`
    /// exceeds the delegated stake.
    pub fn remove_delegation(
        &self,
        state: &dyn StateDb,
        identity: Address,
        amount: &BigUint,
    ) -> Result<(), LedgerError> {
        self.update(state, identity, |record| {
            if *amount > record.delegated_stake {
                return Err(LedgerError::InsufficientDelegation {
                    identity,
                    available: record.delegated_stake.clone(),
                    requested: amount.clone(),
                });
            }
            record.delegated_stake -= amount;
            Ok(())
        })?;
        debug!(target: "ledger", %identity, %amount, "Delegation removed");
        Ok(())
    }

    pub fn set_liquidity_stake(
        &self,
        state: &dyn StateDb,
        identity: Address,
        amount: BigUint,
    ) -> Result<(), LedgerError> {
        self.update(state, identity, |record| {
            record.liquidity_stake = amount;
            Ok(())
        })
    }

    /// Sum of the delegated stake of `identities`. Missing records add zero.
    pub fn total_delegation(&self, state: &dyn StateDb, identities: &[Address]) -> BigUint {
        identities
            .iter()
            .map(|identity| self.delegated_stake(state, *identity))
            .sum()
    }
}
