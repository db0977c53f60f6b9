// Path: crates/types/src/config/fork.rs
//! Protocol-upgrade schedule.

use crate::error::ConfigError;
use crate::keys::MAX_GAS_LIMIT;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The predicate that switches a fork on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Active from this block number on.
    Block(u64),
    /// Active from this block timestamp on.
    Timestamp(u64),
}

impl Activation {
    pub fn is_active(&self, number: u64, timestamp: u64) -> bool {
        match *self {
            Activation::Block(at) => number >= at,
            Activation::Timestamp(at) => timestamp >= at,
        }
    }
}

/// Protocol upgrades that change the header constraint set, in activation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fork {
    /// Base rules, always active.
    Genesis,
    /// Fee market: base fee required.
    London,
    /// Withdrawals: withdrawals root required; stake rewards become active.
    Shanghai,
    /// Blob fee market and beacon root binding.
    Cancun,
}

impl Fork {
    /// All forks in activation order.
    pub const ALL: [Fork; 4] = [Fork::Genesis, Fork::London, Fork::Shanghai, Fork::Cancun];

    pub fn predecessor(self) -> Option<Fork> {
        match self {
            Fork::Genesis => None,
            Fork::London => Some(Fork::Genesis),
            Fork::Shanghai => Some(Fork::London),
            Fork::Cancun => Some(Fork::Shanghai),
        }
    }
}

impl fmt::Display for Fork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Fork::Genesis => "genesis",
            Fork::London => "london",
            Fork::Shanghai => "shanghai",
            Fork::Cancun => "cancun",
        };
        f.write_str(name)
    }
}

/// Chain identity, fork schedule, and protocol-wide header limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSpec {
    pub chain_id: u64,
    #[serde(default)]
    pub london: Option<Activation>,
    #[serde(default)]
    pub shanghai: Option<Activation>,
    #[serde(default)]
    pub cancun: Option<Activation>,
    #[serde(default = "default_max_gas_limit")]
    pub max_gas_limit: u64,
}

fn default_max_gas_limit() -> u64 {
    MAX_GAS_LIMIT
}

impl Default for ChainSpec {
    fn default() -> Self {
        Self {
            chain_id: 1,
            london: None,
            shanghai: None,
            cancun: None,
            max_gas_limit: default_max_gas_limit(),
        }
    }
}

impl ChainSpec {
    /// A chain spec with every fork active from genesis.
    pub fn all_forks(chain_id: u64) -> Self {
        Self {
            chain_id,
            london: Some(Activation::Block(0)),
            shanghai: Some(Activation::Timestamp(0)),
            cancun: Some(Activation::Timestamp(0)),
            max_gas_limit: default_max_gas_limit(),
        }
    }

    /// The activation predicate of a fork, if scheduled.
    pub fn activation(&self, fork: Fork) -> Option<Activation> {
        match fork {
            Fork::Genesis => Some(Activation::Block(0)),
            Fork::London => self.london,
            Fork::Shanghai => self.shanghai,
            Fork::Cancun => self.cancun,
        }
    }

    /// Rejects schedules where a fork is set but one of its predecessors is not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for fork in Fork::ALL {
            let Some(predecessor) = fork.predecessor() else {
                continue;
            };
            if self.activation(fork).is_some() && self.activation(predecessor).is_none() {
                return Err(ConfigError::MissingPredecessor { fork, predecessor });
            }
        }
        Ok(())
    }

    /// The most recently activated fork at the given height and time.
    ///
    /// Predicates are evaluated in order and the walk stops at the first fork that is
    /// not active, so a fork never counts as active while a predecessor is not.
    pub fn active_fork(&self, number: u64, timestamp: u64) -> Fork {
        let mut active = Fork::Genesis;
        for fork in [Fork::London, Fork::Shanghai, Fork::Cancun] {
            match self.activation(fork) {
                Some(activation) if activation.is_active(number, timestamp) => active = fork,
                _ => break,
            }
        }
        active
    }

    pub fn is_active(&self, fork: Fork, number: u64, timestamp: u64) -> bool {
        self.active_fork(number, timestamp) >= fork
    }

    pub fn is_london(&self, number: u64, timestamp: u64) -> bool {
        self.is_active(Fork::London, number, timestamp)
    }

    pub fn is_shanghai(&self, number: u64, timestamp: u64) -> bool {
        self.is_active(Fork::Shanghai, number, timestamp)
    }

    pub fn is_cancun(&self, number: u64, timestamp: u64) -> bool {
        self.is_active(Fork::Cancun, number, timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged() -> ChainSpec {
        ChainSpec {
            chain_id: 7,
            london: Some(Activation::Block(10)),
            shanghai: Some(Activation::Timestamp(1_000)),
            cancun: Some(Activation::Timestamp(2_000)),
            max_gas_limit: MAX_GAS_LIMIT,
        }
    }

    #[test]
    fn active_fork_follows_schedule() {
        let spec = staged();
        assert_eq!(spec.active_fork(9, 5_000), Fork::Genesis);
        assert_eq!(spec.active_fork(10, 999), Fork::London);
        assert_eq!(spec.active_fork(11, 1_000), Fork::Shanghai);
        assert_eq!(spec.active_fork(12, 2_000), Fork::Cancun);
    }

    #[test]
    fn later_fork_needs_predecessor_active() {
        let spec = ChainSpec {
            london: Some(Activation::Block(100)),
            ..staged()
        };
        // Shanghai and Cancun timestamps have passed, London's block has not.
        assert_eq!(spec.active_fork(50, 5_000), Fork::Genesis);
        assert!(!spec.is_shanghai(50, 5_000));
    }

    #[test]
    fn validate_rejects_gaps() {
        let spec = ChainSpec {
            shanghai: None,
            ..staged()
        };
        assert_eq!(
            spec.validate(),
            Err(ConfigError::MissingPredecessor {
                fork: Fork::Cancun,
                predecessor: Fork::Shanghai
            })
        );
        assert!(staged().validate().is_ok());
    }

    #[test]
    fn spec_from_toml() {
        let spec: ChainSpec = toml::from_str(
            r#"
            chain_id = 80094
            london = { block = 0 }
            shanghai = { timestamp = 1700000000 }
            "#,
        )
        .unwrap();
        assert_eq!(spec.london, Some(Activation::Block(0)));
        assert_eq!(spec.shanghai, Some(Activation::Timestamp(1_700_000_000)));
        assert_eq!(spec.cancun, None);
        assert_eq!(spec.max_gas_limit, MAX_GAS_LIMIT);
    }
}
