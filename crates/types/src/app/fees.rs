// Path: crates/types/src/app/fees.rs
//! Fee-market and blob-fee formulas shared by validation and block production.

use super::Header;
use crate::config::ChainSpec;
use crate::keys::{
    BASE_FEE_CHANGE_DENOMINATOR, ELASTICITY_MULTIPLIER, INITIAL_BASE_FEE,
    TARGET_BLOB_GAS_PER_BLOCK,
};

/// The base fee a child of `parent` must carry.
///
/// The first fee-market block uses the initial base fee. After that the fee moves toward
/// the gas target (half the gas limit) by at most 1/8 per block, and always by at least
/// one wei when the parent was over target.
pub fn calc_base_fee(spec: &ChainSpec, parent: &Header) -> u64 {
    if !spec.is_london(parent.number, parent.timestamp) {
        return INITIAL_BASE_FEE;
    }
    let parent_base_fee = u128::from(parent.base_fee_per_gas.unwrap_or_default());
    let target = u128::from(parent.gas_limit / ELASTICITY_MULTIPLIER);
    let used = u128::from(parent.gas_used);
    let denominator = u128::from(BASE_FEE_CHANGE_DENOMINATOR);

    if target == 0 || used == target {
        return parent.base_fee_per_gas.unwrap_or_default();
    }
    let next = if used > target {
        let delta = (parent_base_fee * (used - target) / target / denominator).max(1);
        parent_base_fee + delta
    } else {
        let delta = parent_base_fee * (target - used) / target / denominator;
        parent_base_fee.saturating_sub(delta)
    };
    u64::try_from(next).unwrap_or(u64::MAX)
}

/// Excess blob gas a child must carry, given the parent's blob accounting.
///
/// Parents from before the blob fork count as having zero of both.
pub fn calc_excess_blob_gas(spec: &ChainSpec, parent: &Header) -> u64 {
    if !spec.is_cancun(parent.number, parent.timestamp) {
        return 0;
    }
    let excess = parent.excess_blob_gas.unwrap_or_default();
    let used = parent.blob_gas_used.unwrap_or_default();
    excess
        .saturating_add(used)
        .saturating_sub(TARGET_BLOB_GAS_PER_BLOCK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Activation;
    use crate::keys::BLOB_GAS_PER_BLOB;

    fn london_parent(gas_used: u64) -> Header {
        Header {
            number: 10,
            gas_limit: 30_000_000,
            gas_used,
            base_fee_per_gas: Some(INITIAL_BASE_FEE),
            ..Default::default()
        }
    }

    #[test]
    fn base_fee_tracks_gas_target() {
        let spec = ChainSpec::all_forks(1);
        assert_eq!(calc_base_fee(&spec, &london_parent(15_000_000)), INITIAL_BASE_FEE);
        // Full block: +12.5%.
        assert_eq!(calc_base_fee(&spec, &london_parent(30_000_000)), 1_125_000_000);
        // Empty block: -12.5%.
        assert_eq!(calc_base_fee(&spec, &london_parent(0)), 875_000_000);
    }

    #[test]
    fn base_fee_increase_is_at_least_one() {
        let spec = ChainSpec::all_forks(1);
        let mut parent = london_parent(15_000_001);
        parent.base_fee_per_gas = Some(7);
        assert_eq!(calc_base_fee(&spec, &parent), 8);
    }

    #[test]
    fn fork_block_uses_initial_base_fee() {
        let spec = ChainSpec {
            london: Some(Activation::Block(11)),
            ..ChainSpec::default()
        };
        let mut parent = london_parent(0);
        parent.base_fee_per_gas = None;
        assert_eq!(calc_base_fee(&spec, &parent), INITIAL_BASE_FEE);
    }

    #[test]
    fn excess_blob_gas_drains_below_target() {
        let spec = ChainSpec::all_forks(1);
        let parent = Header {
            blob_gas_used: Some(4 * BLOB_GAS_PER_BLOB),
            excess_blob_gas: Some(BLOB_GAS_PER_BLOB),
            ..Default::default()
        };
        assert_eq!(calc_excess_blob_gas(&spec, &parent), 2 * BLOB_GAS_PER_BLOB);

        let quiet = Header {
            blob_gas_used: Some(0),
            excess_blob_gas: Some(BLOB_GAS_PER_BLOB),
            ..Default::default()
        };
        assert_eq!(calc_excess_blob_gas(&spec, &quiet), 0);
        assert_eq!(calc_excess_blob_gas(&ChainSpec::default(), &parent), 0);
    }
}
