// Path: crates/api/src/consensus/mod.rs
//! Defines the capability traits of the two engines the hybrid engine composes.
//!
//! The signer-rotation engine owns signatures, turn order, votes, and sealing. The
//! stake engine owns withdrawals and post-upgrade block assembly. Neither is
//! implemented in this workspace; the hybrid engine only sequences them.

use crate::chain::ChainHeaderReader;
use crate::state::StateDb;
use alloy_primitives::{Address, B256, U256};
use tandem_types::app::{Block, BlockBody, Header};
use tandem_types::error::{AuthorityError, FinalityError};

/// The signer-rotation (authority) engine.
pub trait HeaderAuthority: Send + Sync {
    /// Recovers the address that sealed the header.
    fn author(&self, header: &Header) -> Result<Address, AuthorityError>;

    /// Checks the seal signature, the signer's turn, and any vote carried by the header.
    fn verify_header(
        &self,
        chain: &dyn ChainHeaderReader,
        header: &Header,
    ) -> Result<(), AuthorityError>;

    /// Fills in the authority fields of a header about to be produced.
    fn prepare(
        &self,
        chain: &dyn ChainHeaderReader,
        header: &mut Header,
    ) -> Result<(), AuthorityError>;

    /// Post-execution state changes before the withdrawals upgrade.
    fn finalize(
        &self,
        chain: &dyn ChainHeaderReader,
        header: &Header,
        state: &dyn StateDb,
        body: &BlockBody,
    ) -> Result<(), AuthorityError>;

    /// Finalizes and assembles a block before the withdrawals upgrade.
    fn finalize_and_assemble(
        &self,
        chain: &dyn ChainHeaderReader,
        header: Header,
        state: &dyn StateDb,
        body: BlockBody,
    ) -> Result<Block, AuthorityError>;

    /// Signs the block and returns the sealed copy.
    fn seal(&self, chain: &dyn ChainHeaderReader, block: Block) -> Result<Block, AuthorityError>;

    /// The hash the seal signature commits to.
    fn seal_hash(&self, header: &Header) -> B256;

    /// The difficulty a block on top of `parent` at `time` should carry.
    fn calc_difficulty(&self, chain: &dyn ChainHeaderReader, time: u64, parent: &Header) -> U256;
}

/// The stake (attestation) engine.
pub trait HeaderFinality: Send + Sync {
    /// Post-execution state changes after the withdrawals upgrade, such as crediting
    /// withdrawals.
    fn finalize(
        &self,
        chain: &dyn ChainHeaderReader,
        header: &Header,
        state: &dyn StateDb,
        body: &BlockBody,
    ) -> Result<(), FinalityError>;

    /// Finalizes and assembles a block after the withdrawals upgrade.
    fn finalize_and_assemble(
        &self,
        chain: &dyn ChainHeaderReader,
        header: Header,
        state: &dyn StateDb,
        body: BlockBody,
    ) -> Result<Block, FinalityError>;
}
