// Path: crates/types/src/app/header.rs
//! The block header and its individually addressable fields.

use alloy_primitives::{keccak256, Address, Bloom, Bytes, B256, B64, U256};
use alloy_rlp::{BufMut, Encodable};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::keys::EMPTY_UNCLE_HASH;

/// A block header as seen by both consensus mechanisms.
///
/// Fields introduced by later protocol upgrades are optional; which of them must be
/// set depends on the fork active at the header's number and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub parent_hash: B256,
    pub uncle_hash: B256,
    pub coinbase: Address,
    pub state_root: B256,
    pub transactions_root: B256,
    pub receipts_root: B256,
    pub logs_bloom: Bloom,
    /// Authority turn signal. `None` models a header that omits it entirely.
    pub difficulty: Option<U256>,
    pub number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    /// Vanity, signer list at checkpoints, and the authority seal.
    pub extra_data: Bytes,
    pub mix_hash: B256,
    /// Authority vote nonce.
    pub nonce: B64,
    pub base_fee_per_gas: Option<u64>,
    pub withdrawals_root: Option<B256>,
    pub blob_gas_used: Option<u64>,
    pub excess_blob_gas: Option<u64>,
    pub parent_beacon_block_root: Option<B256>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            parent_hash: B256::ZERO,
            uncle_hash: EMPTY_UNCLE_HASH,
            coinbase: Address::ZERO,
            state_root: B256::ZERO,
            transactions_root: B256::ZERO,
            receipts_root: B256::ZERO,
            logs_bloom: Bloom::ZERO,
            difficulty: None,
            number: 0,
            gas_limit: 0,
            gas_used: 0,
            timestamp: 0,
            extra_data: Bytes::new(),
            mix_hash: B256::ZERO,
            nonce: B64::ZERO,
            base_fee_per_gas: None,
            withdrawals_root: None,
            blob_gas_used: None,
            excess_blob_gas: None,
            parent_beacon_block_root: None,
        }
    }
}

impl Header {
    /// Keccak-256 of the header's RLP encoding.
    pub fn hash(&self) -> B256 {
        keccak256(alloy_rlp::encode(self))
    }

    /// Reads a header field as a comparable value. `None` means the field is unset.
    pub fn field(&self, field: HeaderField) -> Option<FieldValue> {
        match field {
            HeaderField::Difficulty => self.difficulty.map(FieldValue::Int),
            HeaderField::UncleHash => Some(FieldValue::Hash(self.uncle_hash)),
            HeaderField::Timestamp => Some(self.timestamp.into()),
            HeaderField::GasLimit => Some(self.gas_limit.into()),
            HeaderField::GasUsed => Some(self.gas_used.into()),
            HeaderField::Number => Some(self.number.into()),
            HeaderField::BaseFee => self.base_fee_per_gas.map(Into::into),
            HeaderField::WithdrawalsRoot => self.withdrawals_root.map(FieldValue::Hash),
            HeaderField::BlobGasUsed => self.blob_gas_used.map(Into::into),
            HeaderField::ExcessBlobGas => self.excess_blob_gas.map(Into::into),
            HeaderField::ParentBeaconRoot => self.parent_beacon_block_root.map(FieldValue::Hash),
        }
    }

    fn visit_fields(&self, visit: &mut dyn FnMut(&dyn Encodable)) {
        visit(&self.parent_hash);
        visit(&self.uncle_hash);
        visit(&self.coinbase);
        visit(&self.state_root);
        visit(&self.transactions_root);
        visit(&self.receipts_root);
        visit(&self.logs_bloom);
        visit(&self.difficulty.unwrap_or_default());
        visit(&self.number);
        visit(&self.gas_limit);
        visit(&self.gas_used);
        visit(&self.timestamp);
        visit(&self.extra_data);
        visit(&self.mix_hash);
        visit(&self.nonce);

        // Optional fields are encoded up to the last one that is set; gaps before it
        // are filled with the empty string.
        let trailing: [Option<&dyn Encodable>; 5] = [
            self.base_fee_per_gas.as_ref().map(|v| v as &dyn Encodable),
            self.withdrawals_root.as_ref().map(|v| v as &dyn Encodable),
            self.blob_gas_used.as_ref().map(|v| v as &dyn Encodable),
            self.excess_blob_gas.as_ref().map(|v| v as &dyn Encodable),
            self.parent_beacon_block_root
                .as_ref()
                .map(|v| v as &dyn Encodable),
        ];
        let present = trailing
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |i| i + 1);
        for field in trailing.iter().take(present) {
            match field {
                Some(value) => visit(*value),
                None => visit(&Bytes::new()),
            }
        }
    }

    fn payload_length(&self) -> usize {
        let mut length = 0;
        self.visit_fields(&mut |field: &dyn Encodable| length += field.length());
        length
    }
}

impl Encodable for Header {
    fn encode(&self, out: &mut dyn BufMut) {
        alloy_rlp::Header {
            list: true,
            payload_length: self.payload_length(),
        }
        .encode(out);
        self.visit_fields(&mut |field: &dyn Encodable| field.encode(&mut *out));
    }

    fn length(&self) -> usize {
        let payload_length = self.payload_length();
        payload_length + alloy_rlp::length_of_length(payload_length)
    }
}

/// Header fields that take part in fork-gated validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    Difficulty,
    UncleHash,
    Timestamp,
    GasLimit,
    GasUsed,
    Number,
    BaseFee,
    WithdrawalsRoot,
    BlobGasUsed,
    ExcessBlobGas,
    ParentBeaconRoot,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeaderField::Difficulty => "difficulty",
            HeaderField::UncleHash => "uncle_hash",
            HeaderField::Timestamp => "timestamp",
            HeaderField::GasLimit => "gas_limit",
            HeaderField::GasUsed => "gas_used",
            HeaderField::Number => "number",
            HeaderField::BaseFee => "base_fee",
            HeaderField::WithdrawalsRoot => "withdrawals_root",
            HeaderField::BlobGasUsed => "blob_gas_used",
            HeaderField::ExcessBlobGas => "excess_blob_gas",
            HeaderField::ParentBeaconRoot => "parent_beacon_root",
        };
        f.write_str(name)
    }
}

/// The value of a header field, normalised for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    /// A numeric field.
    Int(U256),
    /// A 32-byte hash field.
    Hash(B256),
}

impl FieldValue {
    /// True for numeric zero or the all-zero hash.
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Int(v) => v.is_zero(),
            FieldValue::Hash(h) => h.is_zero(),
        }
    }

    /// The numeric value, if this is a numeric field.
    pub fn as_int(&self) -> Option<U256> {
        match self {
            FieldValue::Int(v) => Some(*v),
            FieldValue::Hash(_) => None,
        }
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Int(U256::from(value))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Hash(h) => write!(f, "{h}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_changes_with_trailing_fields() {
        let pre = Header {
            number: 7,
            gas_limit: 30_000_000,
            ..Default::default()
        };
        let mut post = pre.clone();
        post.base_fee_per_gas = Some(1_000_000_000);
        assert_ne!(pre.hash(), post.hash());

        let mut gap = post.clone();
        gap.base_fee_per_gas = None;
        gap.withdrawals_root = Some(B256::repeat_byte(0x11));
        assert_ne!(gap.hash(), post.hash());
    }

    #[test]
    fn encoded_length_matches_buffer() {
        let header = Header {
            difficulty: Some(U256::from(2)),
            number: 42,
            extra_data: Bytes::from(vec![0u8; 97]),
            base_fee_per_gas: Some(7),
            parent_beacon_block_root: Some(B256::repeat_byte(0xaa)),
            ..Default::default()
        };
        let encoded = alloy_rlp::encode(&header);
        assert_eq!(encoded.len(), header.length());
    }

    #[test]
    fn unset_fields_read_as_none() {
        let header = Header::default();
        assert!(header.field(HeaderField::Difficulty).is_none());
        assert!(header.field(HeaderField::WithdrawalsRoot).is_none());
        assert_eq!(
            header.field(HeaderField::UncleHash),
            Some(FieldValue::Hash(EMPTY_UNCLE_HASH))
        );
    }
}
