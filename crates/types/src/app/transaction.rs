// Path: crates/types/src/app/transaction.rs
//! The unsigned, system-originated reward distribution transaction.

use crate::keys::DISTRIBUTION_TX_TYPE;
use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_rlp::{Decodable, Encodable, RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// A one-shot transaction that calls the reward distributor on behalf of a validator.
///
/// It carries no signature. The execution engine accepts it only because `from` is the
/// reserved system address. The nonce is `block_number - 1`, which ties the call to a
/// single height instead of an account counter.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, RlpEncodable, RlpDecodable,
)]
pub struct SystemDistributionTx {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: U256,
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
}

impl SystemDistributionTx {
    /// Typed-envelope byte.
    pub const TX_TYPE: u8 = DISTRIBUTION_TX_TYPE;

    /// System calls never transfer value.
    pub fn value(&self) -> U256 {
        U256::ZERO
    }

    pub fn gas_tip_cap(&self) -> U256 {
        U256::ZERO
    }

    pub fn gas_fee_cap(&self) -> U256 {
        self.gas_price
    }

    /// The price paid per gas unit, independent of the block's base fee.
    pub fn effective_gas_price(&self, _base_fee: Option<u64>) -> U256 {
        self.gas_price
    }

    /// `(v, r, s)`, all zero.
    pub fn signature_values(&self) -> (U256, U256, U256) {
        (U256::ZERO, U256::ZERO, U256::ZERO)
    }

    /// `type || rlp(tx)`.
    pub fn encode_typed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.length());
        out.push(Self::TX_TYPE);
        self.encode(&mut out);
        out
    }

    /// Inverse of [`encode_typed`](Self::encode_typed). Trailing bytes are rejected.
    pub fn decode_typed(buf: &[u8]) -> Result<Self, alloy_rlp::Error> {
        let (ty, mut rest) = buf.split_first().ok_or(alloy_rlp::Error::InputTooShort)?;
        if *ty != Self::TX_TYPE {
            return Err(alloy_rlp::Error::Custom("unexpected transaction type"));
        }
        let tx = Self::decode(&mut rest)?;
        if !rest.is_empty() {
            return Err(alloy_rlp::Error::UnexpectedLength);
        }
        Ok(tx)
    }

    /// Hash of the typed encoding.
    pub fn hash(&self) -> B256 {
        keccak256(self.encode_typed())
    }

    /// Signing hash over `[chain_id, from, to, nonce, gas_price, gas_limit, data]`.
    pub fn sig_hash(&self, chain_id: u64) -> B256 {
        let fields: [&dyn Encodable; 7] = [
            &chain_id,
            &self.from,
            &self.to,
            &self.nonce,
            &self.gas_price,
            &self.gas_limit,
            &self.data,
        ];
        let payload_length: usize = fields.iter().map(|f| f.length()).sum();
        let mut out = Vec::with_capacity(1 + alloy_rlp::length_of_length(payload_length) + payload_length);
        out.push(Self::TX_TYPE);
        alloy_rlp::Header {
            list: true,
            payload_length,
        }
        .encode(&mut out);
        for field in fields {
            field.encode(&mut out);
        }
        keccak256(out)
    }
}
