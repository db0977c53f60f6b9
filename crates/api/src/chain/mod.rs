// Path: crates/api/src/chain/mod.rs
//! Defines the `ChainHeaderReader` trait for looking up already-imported headers.

use alloy_primitives::B256;
use std::sync::Arc;
use tandem_types::app::Header;
use tandem_types::config::ChainSpec;

/// Read-only view of the local header chain.
pub trait ChainHeaderReader: Send + Sync {
    /// The fork schedule and protocol limits of this chain.
    fn chain_spec(&self) -> &ChainSpec;

    /// Looks up a header by hash and number. Both must match.
    fn header(&self, hash: B256, number: u64) -> Option<Header>;

    /// Looks up a canonical header by number.
    fn header_by_number(&self, number: u64) -> Option<Header>;
}

impl<T: ChainHeaderReader + ?Sized> ChainHeaderReader for Arc<T> {
    fn chain_spec(&self) -> &ChainSpec {
        (**self).chain_spec()
    }

    fn header(&self, hash: B256, number: u64) -> Option<Header> {
        (**self).header(hash, number)
    }

    fn header_by_number(&self, number: u64) -> Option<Header> {
        (**self).header_by_number(number)
    }
}
