// Path: crates/consensus/src/selector.rs
//! Delegation-weighted proposer selection.

use alloy_primitives::Address;
use num_traits::Zero;
use tandem_api::state::StateDb;
use tandem_types::error::SelectionError;
use tracing::debug;

use crate::ledger::IncentiveLedger;

/// Picks the candidate with the strictly greatest delegated stake.
///
/// Candidates arrive in the authority engine's turn order and are never reordered:
/// ties go to the earliest candidate, and when nobody has any delegation the first
/// candidate is chosen.
pub fn choose_proposer(
    ledger: &IncentiveLedger,
    state: &dyn StateDb,
    candidates: &[Address],
) -> Result<Address, SelectionError> {
    let first = *candidates.first().ok_or(SelectionError::NoCandidates)?;

    let stakes: Vec<_> = candidates
        .iter()
        .map(|candidate| (*candidate, ledger.delegated_stake(state, *candidate)))
        .collect();

    if stakes.iter().all(|(_, stake)| stake.is_zero()) {
        debug!(target: "consensus", %first, "No delegation recorded, using turn order");
        return Ok(first);
    }

    let mut best: Option<&(Address, _)> = None;
    for entry in &stakes {
        match best {
            Some((_, best_stake)) if entry.1 <= *best_stake => {}
            _ => best = Some(entry),
        }
    }
    Ok(best.map_or(first, |(identity, _)| *identity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::KeccakSlotPolicy;
    use num_bigint::BigUint;
    use std::sync::Arc;
    use tandem_test_utils::mocks::MemoryState;
    use tandem_types::keys::INCENTIVE_LEDGER_NAMESPACE;

    fn setup(stakes: &[(Address, u64)]) -> (IncentiveLedger, MemoryState) {
        let ledger =
            IncentiveLedger::new(Arc::new(KeccakSlotPolicy::new(INCENTIVE_LEDGER_NAMESPACE)));
        let state = MemoryState::new();
        for (identity, stake) in stakes {
            ledger
                .add_delegation(&state, *identity, &BigUint::from(*stake))
                .unwrap();
        }
        (ledger, state)
    }

    #[test]
    fn ties_go_to_first_maximum() {
        let a = Address::repeat_byte(0xa);
        let b = Address::repeat_byte(0xb);
        let c = Address::repeat_byte(0xc);
        let (ledger, state) = setup(&[(a, 5), (b, 9), (c, 9)]);
        assert_eq!(choose_proposer(&ledger, &state, &[a, b, c]).unwrap(), b);
        assert_eq!(choose_proposer(&ledger, &state, &[c, b, a]).unwrap(), c);
    }

    #[test]
    fn no_delegation_means_turn_order() {
        let a = Address::repeat_byte(0x1);
        let b = Address::repeat_byte(0x2);
        let (ledger, state) = setup(&[]);
        assert_eq!(choose_proposer(&ledger, &state, &[b, a]).unwrap(), b);
    }

    #[test]
    fn empty_candidates_fail() {
        let (ledger, state) = setup(&[]);
        assert_eq!(
            choose_proposer(&ledger, &state, &[]).unwrap_err(),
            SelectionError::NoCandidates
        );
    }
}
