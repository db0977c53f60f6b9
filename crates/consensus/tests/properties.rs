// Path: crates/consensus/tests/properties.rs
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use num_bigint::BigUint;
use proptest::prelude::*;
use tandem_api::state::StateDb;
use tandem_consensus::{choose_proposer, HybridEngine, IncentiveLedger, KeccakSlotPolicy, RewardEngine};
use tandem_test_utils::fixtures;
use tandem_test_utils::mocks::{MemoryChain, MemoryState, MockAuthority, MockFinality};
use tandem_types::app::HeaderField;
use tandem_types::config::{Activation, ChainSpec, HybridConfig, IncentiveConfig};
use tandem_types::error::{HeaderError, LedgerError, Mechanism, Presence};
use tandem_types::keys::INCENTIVE_LEDGER_NAMESPACE;

fn ledger() -> IncentiveLedger {
    IncentiveLedger::new(Arc::new(KeccakSlotPolicy::new(INCENTIVE_LEDGER_NAMESPACE)))
}

fn engine(spec: ChainSpec) -> HybridEngine<MockAuthority, MockFinality> {
    let config = HybridConfig {
        chain: spec,
        ..HybridConfig::default()
    };
    HybridEngine::new(
        Arc::new(MockAuthority::new()),
        Arc::new(MockFinality::new()),
        &config,
    )
    .unwrap()
}

proptest! {
    #[test]
    fn difficulty_outside_sentinels_never_verifies(difficulty in any::<u64>().prop_filter("sentinel", |d| *d != 1 && *d != 2)) {
        let spec = ChainSpec::all_forks(1);
        let headers = fixtures::chain(&spec, 2);
        let chain = MemoryChain::new(spec.clone());
        chain.insert(headers[0].clone());
        let mut header = headers[1].clone();
        header.difficulty = Some(U256::from(difficulty));

        let err = engine(spec).verify_header(&chain, &header).unwrap_err();
        prop_assert_eq!(err.mechanism(), Mechanism::Authority);
    }

    #[test]
    fn withdrawals_root_is_symmetric_around_its_fork(activation in 13u64..200, with_root in any::<bool>()) {
        let spec = ChainSpec {
            london: Some(Activation::Block(0)),
            shanghai: Some(Activation::Timestamp(activation)),
            ..ChainSpec::default()
        };
        let headers = fixtures::chain(&spec, 20);
        let chain = MemoryChain::new(spec.clone());
        chain.extend(headers.iter().cloned());
        let engine = engine(spec.clone());

        for header in headers.iter().skip(1) {
            let active = spec.is_shanghai(header.number, header.timestamp);
            let mut header = header.clone();
            header.withdrawals_root = with_root.then(Default::default);
            let result = engine.verify_header(&chain, &header);
            if active == with_root {
                prop_assert!(result.is_ok(), "{:?}", result);
            } else {
                let expected = if active { Presence::Present } else { Presence::Absent };
                match result {
                    Err(HeaderError::ForkConsistency { field, expected: got, .. }) => {
                        prop_assert_eq!(field, HeaderField::WithdrawalsRoot);
                        prop_assert_eq!(got, expected);
                    }
                    other => prop_assert!(false, "unexpected {:?}", other),
                }
            }
        }
    }

    #[test]
    fn add_then_remove_restores_delegation(initial in any::<u128>(), amount in any::<u128>()) {
        let state = MemoryState::new();
        let ledger = ledger();
        let identity = Address::repeat_byte(0x42);
        ledger.add_delegation(&state, identity, &BigUint::from(initial)).unwrap();

        ledger.add_delegation(&state, identity, &BigUint::from(amount)).unwrap();
        ledger.remove_delegation(&state, identity, &BigUint::from(amount)).unwrap();
        prop_assert_eq!(ledger.delegated_stake(&state, identity), BigUint::from(initial));
    }

    #[test]
    fn removing_more_than_delegated_changes_nothing(stake in 0u64..1_000_000, excess in 1u64..1_000) {
        let state = MemoryState::new();
        let ledger = ledger();
        let identity = Address::repeat_byte(0x43);
        ledger.add_delegation(&state, identity, &BigUint::from(stake)).unwrap();
        let before = ledger.get(&state, identity);

        let err = ledger
            .remove_delegation(&state, identity, &BigUint::from(stake + excess))
            .unwrap_err();
        let is_insufficient = matches!(err, LedgerError::InsufficientDelegation { .. });
        prop_assert!(is_insufficient);
        prop_assert_eq!(ledger.get(&state, identity), before);
    }

    #[test]
    fn selector_picks_first_maximum(stakes in prop::collection::vec(0u64..5, 1..8)) {
        let state = MemoryState::new();
        let ledger = ledger();
        let candidates: Vec<Address> = (0..stakes.len())
            .map(|i| Address::repeat_byte(i as u8 + 1))
            .collect();
        for (identity, stake) in candidates.iter().zip(&stakes) {
            ledger.add_delegation(&state, *identity, &BigUint::from(*stake)).unwrap();
        }

        let max = stakes.iter().copied().max().unwrap_or(0);
        let expected = stakes.iter().position(|s| *s == max).unwrap_or(0);
        let chosen = choose_proposer(&ledger, &state, &candidates).unwrap();
        prop_assert_eq!(chosen, candidates[expected]);
    }

    #[test]
    fn repeated_distributions_sum(delegation in any::<u64>(), rounds in 1usize..6) {
        let state = MemoryState::new();
        let ledger = ledger();
        let rewards = RewardEngine::new(&IncentiveConfig::default()).unwrap();
        let proposer = Address::repeat_byte(0x44);
        ledger.add_delegation(&state, proposer, &BigUint::from(delegation)).unwrap();

        let mut sum = BigUint::from(0u8);
        let mut credited = U256::ZERO;
        for _ in 0..rounds {
            let out = rewards.distribute(&ledger, &state, proposer).unwrap();
            sum += out.reward;
            credited += out.credited;
        }
        prop_assert_eq!(ledger.get(&state, proposer).total_rewards, sum);
        prop_assert_eq!(state.balance(proposer), credited);
    }
}
