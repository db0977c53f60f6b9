// Path: crates/test_utils/src/mocks/chain.rs
use alloy_primitives::B256;
use parking_lot::RwLock;
use std::collections::HashMap;
use tandem_api::chain::ChainHeaderReader;
use tandem_types::app::Header;
use tandem_types::config::ChainSpec;

/// A header store keyed by hash, with a canonical number index.
#[derive(Debug)]
pub struct MemoryChain {
    spec: ChainSpec,
    by_hash: RwLock<HashMap<B256, Header>>,
    canonical: RwLock<HashMap<u64, B256>>,
}

impl MemoryChain {
    pub fn new(spec: ChainSpec) -> Self {
        Self {
            spec,
            by_hash: RwLock::new(HashMap::new()),
            canonical: RwLock::new(HashMap::new()),
        }
    }

    /// Stores a header and makes it canonical at its number.
    pub fn insert(&self, header: Header) -> B256 {
        let hash = header.hash();
        self.canonical.write().insert(header.number, hash);
        self.by_hash.write().insert(hash, header);
        hash
    }

    pub fn extend(&self, headers: impl IntoIterator<Item = Header>) {
        for header in headers {
            self.insert(header);
        }
    }
}

impl ChainHeaderReader for MemoryChain {
    fn chain_spec(&self) -> &ChainSpec {
        &self.spec
    }

    fn header(&self, hash: B256, number: u64) -> Option<Header> {
        self.by_hash
            .read()
            .get(&hash)
            .filter(|header| header.number == number)
            .cloned()
    }

    fn header_by_number(&self, number: u64) -> Option<Header> {
        let hash = *self.canonical.read().get(&number)?;
        self.by_hash.read().get(&hash).cloned()
    }
}
