// Path: crates/consensus/src/common/stake_requirements.rs
//! The optional minimum-stake check on block proposers.

use alloy_primitives::Address;
use num_bigint::BigUint;
use tandem_api::state::StateDb;
use tandem_types::config::IncentiveConfig;
use tandem_types::error::StakeRequirementError;

use crate::ledger::IncentiveLedger;

/// Requires a proposer to hold minimum delegated and liquidity stake.
///
/// Disabled unless `enforce_stake_requirements` is set; a disabled stage accepts every
/// proposer without reading state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeRequirementStage {
    enabled: bool,
    min_delegation: BigUint,
    min_liquidity_stake: BigUint,
}

impl StakeRequirementStage {
    pub fn new(config: &IncentiveConfig) -> Self {
        Self {
            enabled: config.enforce_stake_requirements,
            min_delegation: config.min_delegation.clone(),
            min_liquidity_stake: config.min_liquidity_stake.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn check(
        &self,
        ledger: &IncentiveLedger,
        state: &dyn StateDb,
        identity: Address,
    ) -> Result<(), StakeRequirementError> {
        if !self.enabled {
            return Ok(());
        }
        let record = ledger.get(state, identity);
        if record.delegated_stake < self.min_delegation {
            return Err(StakeRequirementError::InsufficientDelegation {
                identity,
                required: self.min_delegation.clone(),
                actual: record.delegated_stake,
            });
        }
        if record.liquidity_stake < self.min_liquidity_stake {
            return Err(StakeRequirementError::InsufficientLiquidity {
                identity,
                required: self.min_liquidity_stake.clone(),
                actual: record.liquidity_stake,
            });
        }
        Ok(())
    }
}
