// Path: crates/types/src/app/validator.rs
//! The per-validator incentive record.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delegation, liquidity, and reward counters of one validator.
///
/// A record that was never written reads as all-zero, and writing all-zero is
/// indistinguishable from never having written it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRecord {
    /// Total stake delegated to the validator by third parties.
    pub delegated_stake: BigUint,
    /// Liquidity stake. Reserved; written but not yet read by any rule.
    pub liquidity_stake: BigUint,
    /// Running total of rewards credited. Never decreases.
    pub total_rewards: BigUint,
}

impl ValidatorRecord {
    /// True if every counter is zero.
    pub fn is_empty(&self) -> bool {
        self.delegated_stake.is_zero()
            && self.liquidity_stake.is_zero()
            && self.total_rewards.is_zero()
    }

    /// Returns the value of one field.
    pub fn field(&self, field: RecordField) -> &BigUint {
        match field {
            RecordField::DelegatedStake => &self.delegated_stake,
            RecordField::LiquidityStake => &self.liquidity_stake,
            RecordField::TotalRewards => &self.total_rewards,
        }
    }
}

/// The fields of a [`ValidatorRecord`], in storage-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordField {
    /// Index 0.
    DelegatedStake,
    /// Index 1.
    LiquidityStake,
    /// Index 2.
    TotalRewards,
}

impl RecordField {
    /// All fields in index order.
    pub const ALL: [RecordField; 3] = [
        RecordField::DelegatedStake,
        RecordField::LiquidityStake,
        RecordField::TotalRewards,
    ];

    /// The field's storage index.
    pub const fn index(self) -> u8 {
        match self {
            RecordField::DelegatedStake => 0,
            RecordField::LiquidityStake => 1,
            RecordField::TotalRewards => 2,
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordField::DelegatedStake => f.write_str("delegated_stake"),
            RecordField::LiquidityStake => f.write_str("liquidity_stake"),
            RecordField::TotalRewards => f.write_str("total_rewards"),
        }
    }
}
