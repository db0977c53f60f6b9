// Path: crates/types/src/app/block.rs
//! Block bodies and assembled blocks.

use super::Header;
use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

/// A validator withdrawal processed by the stake engine after the withdrawals fork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub index: u64,
    pub validator_index: u64,
    pub address: Address,
    /// Amount in gwei.
    pub amount: u64,
}

/// The executable contents of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockBody {
    /// Encoded transactions, opaque to this core.
    pub transactions: Vec<Bytes>,
    pub uncles: Vec<Header>,
    /// Set once the withdrawals fork is active.
    pub withdrawals: Option<Vec<Withdrawal>>,
}

/// A header together with its body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: Header,
    pub body: BlockBody,
}

impl Block {
    pub fn new(header: Header, body: BlockBody) -> Self {
        Self { header, body }
    }

    pub fn uncles(&self) -> &[Header] {
        &self.body.uncles
    }
}
