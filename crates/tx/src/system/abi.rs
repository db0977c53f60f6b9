// Path: crates/tx/src/system/abi.rs
//! The slice of the contract ABI needed to call `distributeFor(bytes)`.

use alloy_primitives::{keccak256, U256};
use once_cell::sync::Lazy;
use tandem_types::keys::DISTRIBUTE_FOR_SIGNATURE;

/// Width of one ABI word.
pub const WORD: usize = 32;

static DISTRIBUTE_FOR_SELECTOR: Lazy<[u8; 4]> = Lazy::new(|| selector(DISTRIBUTE_FOR_SIGNATURE));

/// The first four bytes of the keccak hash of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let [a, b, c, d, ..] = keccak256(signature.as_bytes()).0;
    [a, b, c, d]
}

pub fn distribute_for_selector() -> [u8; 4] {
    *DISTRIBUTE_FOR_SELECTOR
}

/// Encodes a call with a single dynamic `bytes` argument.
///
/// Layout: `selector || offset (0x20) || length || data`, with `data` right-padded to a
/// whole number of words.
pub fn encode_bytes_call(selector: [u8; 4], data: &[u8]) -> Vec<u8> {
    let padded = data.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(4 + 2 * WORD + padded);
    out.extend_from_slice(&selector);
    out.extend_from_slice(&U256::from(WORD).to_be_bytes::<32>());
    out.extend_from_slice(&U256::from(data.len()).to_be_bytes::<32>());
    out.extend_from_slice(data);
    out.resize(4 + 2 * WORD + padded, 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_matches_known_function() {
        // transfer(address,uint256)
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(distribute_for_selector(), selector("distributeFor(bytes)"));
    }

    #[test]
    fn bytes_argument_is_offset_length_and_padded() {
        let encoded = encode_bytes_call([1, 2, 3, 4], &[0xaa; 33]);
        assert_eq!(encoded.len(), 4 + 32 + 32 + 64);
        assert_eq!(&encoded[..4], &[1, 2, 3, 4]);
        assert_eq!(encoded[4 + 31], 0x20);
        assert_eq!(encoded[4 + 63], 33);
        assert!(encoded[4 + 64..4 + 64 + 33].iter().all(|b| *b == 0xaa));
        assert!(encoded[4 + 64 + 33..].iter().all(|b| *b == 0));
    }

    #[test]
    fn empty_bytes_have_no_data_words() {
        let encoded = encode_bytes_call([0; 4], &[]);
        assert_eq!(encoded.len(), 4 + 64);
    }
}
