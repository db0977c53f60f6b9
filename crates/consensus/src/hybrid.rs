// Path: crates/consensus/src/hybrid.rs
//! The combined authority/stake engine.
//!
//! [`HybridEngine`] owns no consensus logic of its own beyond sequencing: signatures,
//! turn order and sealing belong to the authority engine, withdrawals and post-upgrade
//! assembly belong to the finality engine, and the structural rules live in
//! [`HeaderConstraintEngine`]. What this module decides is *which* engine runs on each
//! path, gated by the withdrawals upgrade.

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use tandem_api::chain::ChainHeaderReader;
use tandem_api::consensus::{HeaderAuthority, HeaderFinality};
use tandem_api::fees::FeeRules;
use tandem_api::state::StateDb;
use tandem_types::app::{Block, BlockBody, Header};
use tandem_types::config::{ChainSpec, HybridConfig};
use tandem_types::error::{ConfigError, EngineError, FinalityError, HeaderError};
use tandem_types::keys::EMPTY_UNCLE_HASH;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::common::StakeRequirementStage;
use crate::header::HeaderConstraintEngine;
use crate::ledger::{slot_policy_from_config, IncentiveLedger};
use crate::reward::{Distribution, RewardEngine};
use crate::selector::choose_proposer;

/// Composes an authority engine `A` and a finality engine `F` into one block engine.
pub struct HybridEngine<A: HeaderAuthority, F: HeaderFinality> {
    authority: Arc<A>,
    finality: Arc<F>,
    headers: Arc<HeaderConstraintEngine<A>>,
    ledger: Arc<IncentiveLedger>,
    rewards: RewardEngine,
    stake: StakeRequirementStage,
    spec: ChainSpec,
}

impl<A: HeaderAuthority, F: HeaderFinality> HybridEngine<A, F> {
    /// Builds the engine, rejecting an inconsistent fork schedule, a zero reward
    /// normalization, or an unknown ledger slot layout.
    pub fn new(authority: Arc<A>, finality: Arc<F>, config: &HybridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let policy = slot_policy_from_config(&config.incentives.ledger)?;
        let rewards = RewardEngine::new(&config.incentives)?;
        let headers = HeaderConstraintEngine::new(Arc::clone(&authority), config.chain.clone());

        Ok(Self {
            authority,
            finality,
            headers: Arc::new(headers),
            ledger: Arc::new(IncentiveLedger::new(policy)),
            rewards,
            stake: StakeRequirementStage::new(&config.incentives),
            spec: config.chain.clone(),
        })
    }

    /// Replaces the fee-market and blob-fee recomputation rules used by header checks.
    pub fn with_fee_rules(self, fees: Arc<dyn FeeRules>) -> Self {
        let headers = HeaderConstraintEngine::new(Arc::clone(&self.authority), self.spec.clone())
            .with_fee_rules(fees);
        Self {
            headers: Arc::new(headers),
            ..self
        }
    }

    pub fn chain_spec(&self) -> &ChainSpec {
        &self.spec
    }

    pub fn ledger(&self) -> &IncentiveLedger {
        &self.ledger
    }

    pub fn rewards(&self) -> &RewardEngine {
        &self.rewards
    }

    pub fn header_engine(&self) -> &HeaderConstraintEngine<A> {
        &self.headers
    }

    /// The wrapped authority engine.
    pub fn authority(&self) -> &A {
        &self.authority
    }

    pub fn finality(&self) -> &F {
        &self.finality
    }

    pub fn author(&self, header: &Header) -> Result<Address, EngineError> {
        Ok(self.authority.author(header)?)
    }

    pub fn verify_header(
        &self,
        chain: &dyn ChainHeaderReader,
        header: &Header,
    ) -> Result<(), HeaderError> {
        self.headers.verify_header(chain, header)
    }

    /// Rejects any block that carries uncles.
    pub fn verify_uncles(&self, block: &Block) -> Result<(), HeaderError> {
        match block.uncles().len() {
            0 => Ok(()),
            n => Err(HeaderError::UnclesNotAllowed(n)),
        }
    }

    /// Lets the authority engine fill its fields, then clears the uncle hash.
    pub fn prepare(&self, chain: &dyn ChainHeaderReader, header: &mut Header) -> Result<(), EngineError> {
        self.authority.prepare(chain, header)?;
        header.uncle_hash = EMPTY_UNCLE_HASH;
        debug!(target: "consensus", number = header.number, "Prepared header");
        Ok(())
    }

    /// Applies post-execution state changes.
    ///
    /// Once withdrawals are active, the finality engine processes withdrawals and the
    /// header's author is paid its block reward; the credited amount is returned. Before
    /// that, only the authority engine runs and `None` is returned.
    pub fn finalize(
        &self,
        chain: &dyn ChainHeaderReader,
        header: &Header,
        state: &dyn StateDb,
        body: &BlockBody,
    ) -> Result<Option<U256>, EngineError> {
        if !self.spec.is_shanghai(header.number, header.timestamp) {
            self.authority.finalize(chain, header, state, body)?;
            return Ok(None);
        }
        self.finality.finalize(chain, header, state, body)?;
        let distribution = self.reward_author(header, state)?;
        Ok(Some(distribution.credited))
    }

    /// Finalizes and assembles a block with the engine responsible for its fork.
    ///
    /// After the withdrawals upgrade the body must carry a withdrawals list; a body
    /// without one is rejected before anything is written. The author's reward is
    /// credited before the finality engine assembles, so the assembled state includes
    /// it. `state` is not rolled back if assembly then fails and must be discarded.
    pub fn finalize_and_assemble(
        &self,
        chain: &dyn ChainHeaderReader,
        header: Header,
        state: &dyn StateDb,
        body: BlockBody,
    ) -> Result<Block, EngineError> {
        if !self.spec.is_shanghai(header.number, header.timestamp) {
            return Ok(self.authority.finalize_and_assemble(chain, header, state, body)?);
        }
        if body.withdrawals.is_none() {
            return Err(FinalityError::Withdrawals("missing withdrawals in block body".into()).into());
        }
        self.reward_author(&header, state)?;
        Ok(self.finality.finalize_and_assemble(chain, header, state, body)?)
    }

    pub fn seal(&self, chain: &dyn ChainHeaderReader, block: Block) -> Result<Block, EngineError> {
        Ok(self.authority.seal(chain, block)?)
    }

    pub fn seal_hash(&self, header: &Header) -> B256 {
        self.authority.seal_hash(header)
    }

    pub fn calc_difficulty(&self, chain: &dyn ChainHeaderReader, time: u64, parent: &Header) -> U256 {
        self.authority.calc_difficulty(chain, time, parent)
    }

    /// Picks the next proposer from the authority engine's turn-ordered candidates.
    pub fn select_proposer(
        &self,
        candidates: &[Address],
        state: &dyn StateDb,
    ) -> Result<Address, EngineError> {
        Ok(choose_proposer(&self.ledger, state, candidates)?)
    }

    /// Checks the header author against the minimum-stake stage; a no-op when the stage
    /// is disabled.
    pub fn verify_stake_requirements(
        &self,
        header: &Header,
        state: &dyn StateDb,
    ) -> Result<(), EngineError> {
        if !self.stake.is_enabled() {
            return Ok(());
        }
        let author = self.authority.author(header)?;
        Ok(self.stake.check(&self.ledger, state, author)?)
    }

    /// Pays `proposer` its block reward regardless of the active fork.
    pub fn distribute_reward(
        &self,
        state: &dyn StateDb,
        proposer: Address,
    ) -> Result<Distribution, EngineError> {
        Ok(self.rewards.distribute(&self.ledger, state, proposer)?)
    }

    fn reward_author(&self, header: &Header, state: &dyn StateDb) -> Result<Distribution, EngineError> {
        let author = self.authority.author(header)?;
        let distribution = self.distribute_reward(state, author)?;
        info!(
            target: "consensus",
            number = header.number,
            %author,
            credited = %distribution.credited,
            "Finalized block with reward"
        );
        Ok(distribution)
    }
}

impl<A: HeaderAuthority + 'static, F: HeaderFinality> HybridEngine<A, F> {
    /// Verifies a batch of headers in order in the background, with or without a
    /// surrounding Tokio runtime.
    ///
    /// See [`HeaderConstraintEngine::verify_headers`].
    pub fn verify_headers(
        &self,
        chain: Arc<dyn ChainHeaderReader>,
        headers: Vec<Header>,
    ) -> (
        watch::Sender<bool>,
        mpsc::Receiver<Result<(), HeaderError>>,
    ) {
        Arc::clone(&self.headers).verify_headers(chain, headers)
    }
}

impl<A: HeaderAuthority, F: HeaderFinality> std::fmt::Debug for HybridEngine<A, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridEngine")
            .field("chain_id", &self.spec.chain_id)
            .field("rewards", &self.rewards)
            .field("stake", &self.stake)
            .finish_non_exhaustive()
    }
}
