// Path: crates/test_utils/src/mocks/engines.rs
use alloy_primitives::{Address, Bytes, B256, U256};
use parking_lot::Mutex;
use std::sync::Arc;
use tandem_api::chain::ChainHeaderReader;
use tandem_api::consensus::{HeaderAuthority, HeaderFinality};
use tandem_api::state::StateDb;
use tandem_types::app::{BalanceChangeReason, Block, BlockBody, Header};
use tandem_types::error::{AuthorityError, FinalityError};
use tandem_types::keys::DIFF_IN_TURN;

/// One call into a mocked engine, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCall {
    AuthorityVerify,
    AuthorityPrepare,
    AuthorityFinalize,
    AuthorityAssemble,
    AuthoritySeal,
    FinalityFinalize,
    FinalityAssemble,
}

/// A journal shared by both mocks so tests can observe cross-engine ordering.
pub type Journal = Arc<Mutex<Vec<EngineCall>>>;

/// A signer-rotation engine that treats the coinbase as the signer.
///
/// With an empty signer set every coinbase is authorized.
#[derive(Debug, Default)]
pub struct MockAuthority {
    signers: Vec<Address>,
    reject: Mutex<Option<AuthorityError>>,
    journal: Journal,
}

impl MockAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signers(signers: Vec<Address>) -> Self {
        Self {
            signers,
            ..Self::default()
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Makes every later `verify_header` fail with `err`.
    pub fn reject_with(&self, err: AuthorityError) {
        *self.reject.lock() = Some(err);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.journal.lock().clone()
    }

    fn record(&self, call: EngineCall) {
        self.journal.lock().push(call);
    }
}

impl HeaderAuthority for MockAuthority {
    fn author(&self, header: &Header) -> Result<Address, AuthorityError> {
        Ok(header.coinbase)
    }

    fn verify_header(
        &self,
        _chain: &dyn ChainHeaderReader,
        header: &Header,
    ) -> Result<(), AuthorityError> {
        self.record(EngineCall::AuthorityVerify);
        if let Some(err) = self.reject.lock().clone() {
            return Err(err);
        }
        if !self.signers.is_empty() && !self.signers.contains(&header.coinbase) {
            return Err(AuthorityError::UnauthorizedSigner(header.coinbase));
        }
        Ok(())
    }

    fn prepare(
        &self,
        chain: &dyn ChainHeaderReader,
        header: &mut Header,
    ) -> Result<(), AuthorityError> {
        self.record(EngineCall::AuthorityPrepare);
        let parent = header
            .number
            .checked_sub(1)
            .and_then(|number| chain.header(header.parent_hash, number))
            .ok_or(AuthorityError::UnknownBlock)?;
        header.difficulty = Some(self.calc_difficulty(chain, header.timestamp, &parent));
        // A real signer-rotation engine leaves this unset; the hybrid engine must fix it.
        header.uncle_hash = B256::ZERO;
        Ok(())
    }

    fn finalize(
        &self,
        _chain: &dyn ChainHeaderReader,
        _header: &Header,
        _state: &dyn StateDb,
        _body: &BlockBody,
    ) -> Result<(), AuthorityError> {
        self.record(EngineCall::AuthorityFinalize);
        Ok(())
    }

    fn finalize_and_assemble(
        &self,
        _chain: &dyn ChainHeaderReader,
        header: Header,
        _state: &dyn StateDb,
        body: BlockBody,
    ) -> Result<Block, AuthorityError> {
        self.record(EngineCall::AuthorityAssemble);
        Ok(Block::new(header, body))
    }

    fn seal(&self, _chain: &dyn ChainHeaderReader, block: Block) -> Result<Block, AuthorityError> {
        self.record(EngineCall::AuthoritySeal);
        let mut block = block;
        let mut extra = block.header.extra_data.to_vec();
        extra.extend_from_slice(&[0u8; 65]);
        block.header.extra_data = Bytes::from(extra);
        Ok(block)
    }

    fn seal_hash(&self, header: &Header) -> B256 {
        header.hash()
    }

    fn calc_difficulty(
        &self,
        _chain: &dyn ChainHeaderReader,
        _time: u64,
        _parent: &Header,
    ) -> U256 {
        DIFF_IN_TURN
    }
}

/// A stake engine that credits withdrawals (gwei amounts) and assembles blocks verbatim.
#[derive(Debug, Default)]
pub struct MockFinality {
    journal: Journal,
}

impl MockFinality {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self { journal }
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.journal.lock().clone()
    }

    fn credit_withdrawals(state: &dyn StateDb, body: &BlockBody) {
        for withdrawal in body.withdrawals.iter().flatten() {
            let wei = U256::from(withdrawal.amount) * U256::from(1_000_000_000u64);
            state.add_balance(withdrawal.address, wei, BalanceChangeReason::Withdrawal);
        }
    }
}

impl HeaderFinality for MockFinality {
    fn finalize(
        &self,
        _chain: &dyn ChainHeaderReader,
        _header: &Header,
        state: &dyn StateDb,
        body: &BlockBody,
    ) -> Result<(), FinalityError> {
        self.journal.lock().push(EngineCall::FinalityFinalize);
        Self::credit_withdrawals(state, body);
        Ok(())
    }

    fn finalize_and_assemble(
        &self,
        _chain: &dyn ChainHeaderReader,
        header: Header,
        state: &dyn StateDb,
        body: BlockBody,
    ) -> Result<Block, FinalityError> {
        self.journal.lock().push(EngineCall::FinalityAssemble);
        if body.withdrawals.is_none() {
            return Err(FinalityError::Assembly(
                "missing withdrawals in block body".into(),
            ));
        }
        Self::credit_withdrawals(state, &body);
        Ok(Block::new(header, body))
    }
}
