// Path: crates/types/src/config/mod.rs
//! Shared configuration structures for the hybrid engine.

use crate::error::ConfigError;
use crate::keys::{ETHER, INCENTIVE_LEDGER_NAMESPACE};
use alloy_primitives::Address;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod fork;
pub use fork::*;

/// What the reward engine does when a reward does not fit the 256-bit balance unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Clamp the credited amount and the stored total to the 256-bit maximum.
    #[default]
    Saturate,
    /// Fail the distribution before anything is written.
    Reject,
}

/// Where and how validator records are laid out in state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStorageConfig {
    /// Storage namespace shared by every validator record.
    #[serde(default = "default_ledger_namespace")]
    pub namespace: Address,
    /// Version of the slot derivation scheme.
    #[serde(default = "default_slot_layout")]
    pub slot_layout: u8,
}

fn default_ledger_namespace() -> Address {
    INCENTIVE_LEDGER_NAMESPACE
}
fn default_slot_layout() -> u8 {
    1
}

impl Default for LedgerStorageConfig {
    fn default() -> Self {
        Self {
            namespace: default_ledger_namespace(),
            slot_layout: default_slot_layout(),
        }
    }
}

/// Reward formula parameters and stake thresholds.
///
/// `reward = base_reward + delegation_weight * delegated_stake / normalization`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncentiveConfig {
    /// Flat reward paid for every block. Defaults to 2% of one ether.
    #[serde(default = "default_base_reward", with = "biguint_decimal")]
    pub base_reward: BigUint,
    #[serde(default = "default_delegation_weight", with = "biguint_decimal")]
    pub delegation_weight: BigUint,
    /// Divisor applied to the weighted delegation. Must be non-zero.
    #[serde(default = "default_normalization", with = "biguint_decimal")]
    pub normalization: BigUint,
    #[serde(default = "BigUint::zero", with = "biguint_decimal")]
    pub min_liquidity_stake: BigUint,
    #[serde(default = "BigUint::zero", with = "biguint_decimal")]
    pub min_delegation: BigUint,
    #[serde(default)]
    pub overflow_policy: OverflowPolicy,
    /// Gates the minimum-stake stage. Off unless set.
    #[serde(default)]
    pub enforce_stake_requirements: bool,
    #[serde(default)]
    pub ledger: LedgerStorageConfig,
}

fn default_base_reward() -> BigUint {
    BigUint::from(2 * ETHER / 100)
}
fn default_delegation_weight() -> BigUint {
    BigUint::from(1u8)
}
fn default_normalization() -> BigUint {
    BigUint::from(1000u16)
}

impl Default for IncentiveConfig {
    fn default() -> Self {
        Self {
            base_reward: default_base_reward(),
            delegation_weight: default_delegation_weight(),
            normalization: default_normalization(),
            min_liquidity_stake: BigUint::zero(),
            min_delegation: BigUint::zero(),
            overflow_policy: OverflowPolicy::default(),
            enforce_stake_requirements: false,
            ledger: LedgerStorageConfig::default(),
        }
    }
}

impl IncentiveConfig {
    /// Checks the parameters that cannot be expressed by the type system.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.normalization.is_zero() {
            return Err(ConfigError::ZeroNormalization);
        }
        Ok(())
    }
}

/// Addresses of the on-chain reward distribution contracts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// The contract that receives `distributeFor` calls.
    #[serde(default)]
    pub distributor: Address,
}

/// Top-level configuration of the hybrid engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HybridConfig {
    #[serde(default)]
    pub chain: ChainSpec,
    #[serde(default)]
    pub incentives: IncentiveConfig,
    #[serde(default)]
    pub distribution: DistributionConfig,
}

impl HybridConfig {
    /// Validates the fork schedule and the incentive parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chain.validate()?;
        self.incentives.validate()
    }
}

impl fmt::Display for HybridConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hybrid(chain: {}, distributor: {}, min_liquidity: {}, delegation_weight: {}, base_reward: {})",
            self.chain.chain_id,
            self.distribution.distributor,
            self.incentives.min_liquidity_stake,
            self.incentives.delegation_weight,
            self.incentives.base_reward,
        )
    }
}

/// Serializes big integers as decimal strings and accepts either strings or plain
/// integers on input, since TOML integers stop at `i64`.
pub mod biguint_decimal {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Int(v) => Ok(BigUint::from(v)),
            Repr::Text(s) => BigUint::from_str(s.trim()).map_err(de::Error::custom),
        }
    }
}
