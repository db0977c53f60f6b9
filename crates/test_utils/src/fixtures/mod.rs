// Path: crates/test_utils/src/fixtures/mod.rs
//! Header fixtures that satisfy every rule of the fork active at their position.

use alloy_primitives::{address, Address, B256};
use tandem_types::app::fees::{calc_base_fee, calc_excess_blob_gas};
use tandem_types::app::Header;
use tandem_types::config::ChainSpec;
use tandem_types::keys::{DIFF_IN_TURN, EMPTY_ROOT_HASH, INITIAL_BASE_FEE};

/// Seconds between fixture blocks.
pub const BLOCK_TIME: u64 = 12;

/// Gas limit of the fixture genesis.
pub const GENESIS_GAS_LIMIT: u64 = 30_000_000;

/// Default signer placed in the coinbase of fixture headers.
pub const SIGNER: Address = address!("5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a");

/// A genesis header carrying the fields required by the forks active at block 0.
pub fn genesis(spec: &ChainSpec) -> Header {
    let mut header = Header {
        number: 0,
        gas_limit: GENESIS_GAS_LIMIT,
        timestamp: 0,
        coinbase: SIGNER,
        difficulty: Some(DIFF_IN_TURN),
        ..Default::default()
    };
    if spec.is_london(0, 0) {
        header.base_fee_per_gas = Some(INITIAL_BASE_FEE);
    }
    fill_fork_fields(spec, &mut header, None);
    header
}

/// A valid child of `parent`, `BLOCK_TIME` seconds later.
pub fn child(spec: &ChainSpec, parent: &Header) -> Header {
    child_at(spec, parent, parent.timestamp + BLOCK_TIME)
}

/// A valid child of `parent` with an explicit timestamp.
pub fn child_at(spec: &ChainSpec, parent: &Header, timestamp: u64) -> Header {
    let number = parent.number + 1;
    let parent_london = spec.is_london(parent.number, parent.timestamp);
    let london = spec.is_london(number, timestamp);
    let mut header = Header {
        parent_hash: parent.hash(),
        number,
        timestamp,
        coinbase: SIGNER,
        difficulty: Some(DIFF_IN_TURN),
        // The first fee-market block doubles the limit to keep the same gas target.
        gas_limit: if london && !parent_london {
            parent.gas_limit * 2
        } else {
            parent.gas_limit
        },
        ..Default::default()
    };
    if london {
        header.base_fee_per_gas = Some(calc_base_fee(spec, parent));
    }
    fill_fork_fields(spec, &mut header, Some(parent));
    header
}

/// `len` headers starting at genesis, each a valid child of the previous one.
pub fn chain(spec: &ChainSpec, len: usize) -> Vec<Header> {
    let mut headers: Vec<Header> = Vec::with_capacity(len);
    for _ in 0..len {
        let next = match headers.last() {
            Some(parent) => child(spec, parent),
            None => genesis(spec),
        };
        headers.push(next);
    }
    headers
}

fn fill_fork_fields(spec: &ChainSpec, header: &mut Header, parent: Option<&Header>) {
    if spec.is_shanghai(header.number, header.timestamp) {
        header.withdrawals_root = Some(EMPTY_ROOT_HASH);
    }
    if spec.is_cancun(header.number, header.timestamp) {
        header.blob_gas_used = Some(0);
        header.excess_blob_gas = Some(parent.map_or(0, |p| calc_excess_blob_gas(spec, p)));
        header.parent_beacon_block_root = Some(B256::repeat_byte(0xbe));
    }
}
