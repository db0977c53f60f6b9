// Path: crates/types/src/keys/mod.rs
//! Defines constants for well-known identities, hashes, and protocol limits.
//!
//! These constants provide a single source of truth for values that both consensus
//! mechanisms and the incentive layer must agree on byte-for-byte.

use alloy_primitives::{address, b256, Address, B256, U256};

/// The reserved, unspendable sender of system-originated transactions.
///
/// Transactions from this address carry no signature; the execution engine accepts
/// them only because it special-cases this sender.
pub const SYSTEM_ADDRESS: Address = address!("fffffffffffffffffffffffffffffffffffffffe");

/// The storage namespace that holds every validator's incentive record by default.
pub const INCENTIVE_LEDGER_NAMESPACE: Address =
    address!("0000000000000000000000000000000000000001");

/// `keccak256(rlp([]))`, the uncle hash of a block without uncles.
pub const EMPTY_UNCLE_HASH: B256 =
    b256!("1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347");

/// Header difficulty signalling that the signer produced the block in its turn.
pub const DIFF_IN_TURN: U256 = U256::from_limbs([2, 0, 0, 0]);

/// Header difficulty signalling an out-of-turn signer.
pub const DIFF_NO_TURN: U256 = U256::from_limbs([1, 0, 0, 0]);

/// Maximum gas limit accepted in any header (`2^63 - 1`).
pub const MAX_GAS_LIMIT: u64 = 0x7fff_ffff_ffff_ffff;

/// Minimum gas limit accepted once the fee market is active.
pub const MIN_GAS_LIMIT: u64 = 5000;

/// Bound divisor of the gas limit, used in update calculations.
pub const GAS_LIMIT_BOUND_DIVISOR: u64 = 1024;

/// One whole native token in its smallest denomination (`10^18`).
pub const ETHER: u128 = 1_000_000_000_000_000_000;

/// Base fee of the first fee-market block.
pub const INITIAL_BASE_FEE: u64 = 1_000_000_000;

/// Bounds the amount the base fee can change between blocks.
pub const BASE_FEE_CHANGE_DENOMINATOR: u64 = 8;

/// Bounds the maximum gas limit a fee-market block may have relative to its target.
pub const ELASTICITY_MULTIPLIER: u64 = 2;

/// Gas consumed by a single blob.
pub const BLOB_GAS_PER_BLOB: u64 = 1 << 17;

/// Target blob gas consumption per block.
pub const TARGET_BLOB_GAS_PER_BLOCK: u64 = 3 * BLOB_GAS_PER_BLOB;

/// Maximum blob gas consumption per block.
pub const MAX_BLOB_GAS_PER_BLOCK: u64 = 6 * BLOB_GAS_PER_BLOB;

/// Canonical signature of the reward-distribution entry point.
pub const DISTRIBUTE_FOR_SIGNATURE: &str = "distributeFor(bytes)";

/// Length in bytes of a validator consensus public key.
pub const VALIDATOR_PUBKEY_LENGTH: usize = 48;

/// Typed-transaction envelope byte of the system distribution transaction.
pub const DISTRIBUTION_TX_TYPE: u8 = 0x7e;

/// `keccak256(rlp(""))`, the root of an empty trie (e.g. no withdrawals).
pub const EMPTY_ROOT_HASH: B256 =
    b256!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");
