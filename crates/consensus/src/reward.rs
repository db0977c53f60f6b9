// Path: crates/consensus/src/reward.rs
//! Delegation-weighted block rewards.

use alloy_primitives::{Address, U256};
use num_bigint::BigUint;
use num_traits::Zero;
use tandem_api::state::StateDb;
use tandem_telemetry::reward_metrics;
use tandem_types::app::{BalanceChangeReason, ValidatorRecord};
use tandem_types::config::{IncentiveConfig, OverflowPolicy};
use tandem_types::error::{ConfigError, RewardError};
use tracing::{info, warn};

use crate::ledger::{slot_max, IncentiveLedger};

/// Computes and pays the proposer reward of a block.
#[derive(Debug, Clone)]
pub struct RewardEngine {
    base_reward: BigUint,
    delegation_weight: BigUint,
    normalization: BigUint,
    overflow_policy: OverflowPolicy,
}

/// What a single distribution did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    /// The reward as computed, before any clamping.
    pub reward: BigUint,
    /// The amount credited to the proposer's balance.
    pub credited: U256,
    /// True when the credit or the stored total was clamped to `2^256 - 1`.
    pub saturated: bool,
}

impl RewardEngine {
    pub fn new(config: &IncentiveConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            base_reward: config.base_reward.clone(),
            delegation_weight: config.delegation_weight.clone(),
            normalization: config.normalization.clone(),
            overflow_policy: config.overflow_policy,
        })
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow_policy
    }

    /// `base + floor(weight * delegated / normalization)`.
    pub fn compute_reward(&self, record: &ValidatorRecord) -> BigUint {
        let bonus = &self.delegation_weight * &record.delegated_stake / &self.normalization;
        &self.base_reward + bonus
    }

    /// Adds the proposer's reward to its running total and credits its balance.
    ///
    /// The ledger read, the reward computation, and the total update happen under the
    /// proposer's lock. A zero reward credits nothing.
    pub fn distribute(
        &self,
        ledger: &IncentiveLedger,
        state: &dyn StateDb,
        proposer: Address,
    ) -> Result<Distribution, RewardError> {
        let distribution = ledger.update(state, proposer, |record| {
            let reward = self.compute_reward(record);
            let max = slot_max();
            let new_total = &record.total_rewards + &reward;
            let overflows = reward > max || new_total > max;

            if overflows && self.overflow_policy == OverflowPolicy::Reject {
                return Err(RewardError::RewardOverflow { reward });
            }
            record.total_rewards = if new_total > max { max } else { new_total };
            let credited = to_u256(&reward).unwrap_or(U256::MAX);
            Ok(Distribution {
                reward,
                credited,
                saturated: overflows,
            })
        })?;

        if !distribution.credited.is_zero() {
            state.add_balance(proposer, distribution.credited, BalanceChangeReason::BlockReward);
        }
        reward_metrics().inc_rewards_distributed();
        if distribution.saturated {
            reward_metrics().inc_reward_saturated();
            warn!(
                target: "rewards",
                %proposer,
                reward = %distribution.reward,
                "Reward exceeds 256 bits, saturated"
            );
        }
        info!(
            target: "rewards",
            validator = %proposer,
            reward = %distribution.credited,
            "Distributed rewards"
        );
        Ok(distribution)
    }
}

fn to_u256(value: &BigUint) -> Option<U256> {
    if value.bits() > 256 {
        return None;
    }
    if value.is_zero() {
        return Some(U256::ZERO);
    }
    Some(U256::from_be_slice(&value.to_bytes_be()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::KeccakSlotPolicy;
    use std::sync::Arc;
    use tandem_test_utils::mocks::MemoryState;
    use tandem_types::keys::INCENTIVE_LEDGER_NAMESPACE;

    fn ledger() -> IncentiveLedger {
        IncentiveLedger::new(Arc::new(KeccakSlotPolicy::new(INCENTIVE_LEDGER_NAMESPACE)))
    }

    fn engine(config: IncentiveConfig) -> RewardEngine {
        RewardEngine::new(&config).unwrap()
    }

    #[test]
    fn reward_adds_weighted_delegation() {
        let rewards = engine(IncentiveConfig::default());
        let record = ValidatorRecord {
            delegated_stake: BigUint::from(5_000u32),
            ..Default::default()
        };
        assert_eq!(
            rewards.compute_reward(&record),
            BigUint::from(20_000_000_000_000_005u64)
        );
        // Below the normalization constant the bonus floors to zero.
        let small = ValidatorRecord {
            delegated_stake: BigUint::from(999u32),
            ..Default::default()
        };
        assert_eq!(
            rewards.compute_reward(&small),
            BigUint::from(20_000_000_000_000_000u64)
        );
    }

    #[test]
    fn two_distributions_accumulate() {
        let state = MemoryState::new();
        let ledger = ledger();
        let rewards = engine(IncentiveConfig::default());
        let proposer = Address::repeat_byte(0x07);
        ledger
            .add_delegation(&state, proposer, &BigUint::from(10_000u32))
            .unwrap();

        let first = rewards.distribute(&ledger, &state, proposer).unwrap();
        let second = rewards.distribute(&ledger, &state, proposer).unwrap();
        assert_eq!(
            ledger.get(&state, proposer).total_rewards,
            &first.reward + &second.reward
        );
        assert_eq!(state.balance(proposer), first.credited + second.credited);
        assert_eq!(
            state.credits()[0].2,
            BalanceChangeReason::BlockReward
        );
    }

    #[test]
    fn zero_reward_credits_nothing() {
        let state = MemoryState::new();
        let rewards = engine(IncentiveConfig {
            base_reward: BigUint::zero(),
            ..Default::default()
        });
        let proposer = Address::repeat_byte(0x08);
        let out = rewards.distribute(&ledger(), &state, proposer).unwrap();
        assert_eq!(out.credited, U256::ZERO);
        assert!(state.credits().is_empty());
    }

    #[test]
    fn overflow_saturates_by_default() {
        let state = MemoryState::new();
        let rewards = engine(IncentiveConfig {
            base_reward: slot_max() + 5u8,
            ..Default::default()
        });
        let proposer = Address::repeat_byte(0x09);
        let ledger = ledger();
        let out = rewards.distribute(&ledger, &state, proposer).unwrap();
        assert!(out.saturated);
        assert_eq!(out.credited, U256::MAX);
        assert_eq!(ledger.get(&state, proposer).total_rewards, slot_max());
    }

    #[test]
    fn overflow_rejected_writes_nothing() {
        let state = MemoryState::new();
        let rewards = engine(IncentiveConfig {
            base_reward: slot_max() + 5u8,
            overflow_policy: OverflowPolicy::Reject,
            ..Default::default()
        });
        let proposer = Address::repeat_byte(0x0a);
        let ledger = ledger();
        let err = rewards.distribute(&ledger, &state, proposer).unwrap_err();
        assert!(matches!(err, RewardError::RewardOverflow { .. }));
        assert!(ledger.get(&state, proposer).is_empty());
        assert_eq!(state.balance(proposer), U256::ZERO);
    }

    #[test]
    fn zero_normalization_fails_construction() {
        let config = IncentiveConfig {
            normalization: BigUint::zero(),
            ..Default::default()
        };
        assert_eq!(
            RewardEngine::new(&config).unwrap_err(),
            ConfigError::ZeroNormalization
        );
    }
}
