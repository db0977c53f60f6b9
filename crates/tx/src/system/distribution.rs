// Path: crates/tx/src/system/distribution.rs
//! The per-block `distributeFor` system call.

use alloy_primitives::{Address, Bytes, U256};
use tandem_telemetry::error_metrics;
use tandem_types::app::SystemDistributionTx;
use tandem_types::config::DistributionConfig;
use tandem_types::error::{EncodingError, ErrorCode};
use tandem_types::keys::{SYSTEM_ADDRESS, VALIDATOR_PUBKEY_LENGTH};
use tracing::{debug, warn};

use super::abi::{distribute_for_selector, encode_bytes_call};

/// Builds distribution transactions for one chain and distributor contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionTrigger {
    chain_id: u64,
    distributor: Address,
}

impl DistributionTrigger {
    pub fn new(chain_id: u64, distributor: Address) -> Self {
        Self {
            chain_id,
            distributor,
        }
    }

    pub fn from_config(chain_id: u64, config: &DistributionConfig) -> Self {
        Self::new(chain_id, config.distributor)
    }

    pub fn distributor(&self) -> Address {
        self.distributor
    }

    /// Builds the call that distributes rewards for the validator owning `pubkey`.
    ///
    /// The key is checked before the block number. The transaction pays `base_fee` per
    /// gas and uses `block_number - 1` as its nonce.
    pub fn build(
        &self,
        block_number: u64,
        gas_limit: u64,
        base_fee: U256,
        pubkey: Option<&[u8]>,
    ) -> Result<SystemDistributionTx, EncodingError> {
        let result = self.build_inner(block_number, gas_limit, base_fee, pubkey);
        if let Err(e) = &result {
            error_metrics().inc_error("distribution", e.code());
            warn!(target: "tx", block_number, error = %e, "Failed to build distribution transaction");
        }
        result
    }

    fn build_inner(
        &self,
        block_number: u64,
        gas_limit: u64,
        base_fee: U256,
        pubkey: Option<&[u8]>,
    ) -> Result<SystemDistributionTx, EncodingError> {
        let data = distribute_for_calldata(pubkey)?;
        let nonce = block_number
            .checked_sub(1)
            .ok_or(EncodingError::InvalidBlockNumber(block_number))?;

        let tx = SystemDistributionTx {
            chain_id: self.chain_id,
            nonce,
            gas_limit,
            gas_price: base_fee,
            from: SYSTEM_ADDRESS,
            to: self.distributor,
            data: Bytes::from(data),
        };
        debug!(target: "tx", block_number, distributor = %self.distributor, hash = %tx.hash(), "Built distribution transaction");
        Ok(tx)
    }

    /// True when the call targets this trigger's distributor.
    pub fn matches(&self, from: Address, to: Option<Address>, data: &[u8]) -> bool {
        is_distribution_call(from, to, data, self.distributor)
    }
}

/// True iff the call comes from the system address, targets `distributor`, and starts
/// with the `distributeFor(bytes)` selector.
pub fn is_distribution_call(
    from: Address,
    to: Option<Address>,
    data: &[u8],
    distributor: Address,
) -> bool {
    from == SYSTEM_ADDRESS
        && to == Some(distributor)
        && data.get(..4) == Some(distribute_for_selector().as_slice())
}

fn distribute_for_calldata(pubkey: Option<&[u8]>) -> Result<Vec<u8>, EncodingError> {
    let pubkey = pubkey.ok_or(EncodingError::MissingPubkey)?;
    if pubkey.len() != VALIDATOR_PUBKEY_LENGTH {
        return Err(EncodingError::MalformedPubkey {
            expected: VALIDATOR_PUBKEY_LENGTH,
            got: pubkey.len(),
        });
    }
    Ok(encode_bytes_call(distribute_for_selector(), pubkey))
}
