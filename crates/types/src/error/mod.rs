// Path: crates/types/src/error/mod.rs
//! Core error types for the Tandem consensus core.

use crate::app::{HeaderField, RecordField};
use crate::config::Fork;
use alloy_primitives::{Address, B256, U256};
use num_bigint::BigUint;
use std::fmt;
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// The consensus mechanism (or cross-cutting rule family) a header rejection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mechanism {
    /// The signer-rotation authority mechanism.
    Authority,
    /// The stake mechanism's structural header rules.
    Stake,
    /// Presence/absence of fields gated by protocol-upgrade activation.
    ForkConsistency,
    /// The header's parent could not be resolved.
    Ancestry,
}

impl Mechanism {
    /// A short label, suitable for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authority => "authority",
            Self::Stake => "stake",
            Self::ForkConsistency => "fork_consistency",
            Self::Ancestry => "ancestry",
        }
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a fork-gated header field was expected to be present or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The field must be set.
    Present,
    /// The field must be unset.
    Absent,
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => f.write_str("present"),
            Self::Absent => f.write_str("absent"),
        }
    }
}

/// Errors returned by the external signer-rotation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    /// The header references a block the authority engine does not know.
    #[error("Unknown block")]
    UnknownBlock,
    /// The header's extra-data does not carry a seal signature.
    #[error("Missing signature in header extra-data")]
    MissingSignature,
    /// The recovered signer is not part of the current authority set.
    #[error("Unauthorized signer {0}")]
    UnauthorizedSigner(Address),
    /// The signer is still inside its recent-signing cool-down window.
    #[error("Signer {0} signed recently and must wait for others")]
    RecentlySigned(Address),
    /// The difficulty does not match the signer's turn.
    #[error("Difficulty does not match the signer's turn")]
    WrongDifficulty,
    /// An authority-set vote carried in the header is malformed.
    #[error("Invalid authority vote: {0}")]
    InvalidVote(String),
    /// Any other failure reported by the authority engine.
    #[error("Authority engine error: {0}")]
    Other(String),
}

impl ErrorCode for AuthorityError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownBlock => "AUTHORITY_UNKNOWN_BLOCK",
            Self::MissingSignature => "AUTHORITY_MISSING_SIGNATURE",
            Self::UnauthorizedSigner(_) => "AUTHORITY_UNAUTHORIZED_SIGNER",
            Self::RecentlySigned(_) => "AUTHORITY_RECENTLY_SIGNED",
            Self::WrongDifficulty => "AUTHORITY_WRONG_DIFFICULTY",
            Self::InvalidVote(_) => "AUTHORITY_INVALID_VOTE",
            Self::Other(_) => "AUTHORITY_ENGINE_ERROR",
        }
    }
}

/// Errors returned by the external stake/finality engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FinalityError {
    /// Withdrawal processing failed.
    #[error("Withdrawal processing failed: {0}")]
    Withdrawals(String),
    /// The block could not be assembled.
    #[error("Block assembly failed: {0}")]
    Assembly(String),
}

impl ErrorCode for FinalityError {
    fn code(&self) -> &'static str {
        match self {
            Self::Withdrawals(_) => "FINALITY_WITHDRAWALS_FAILED",
            Self::Assembly(_) => "FINALITY_ASSEMBLY_FAILED",
        }
    }
}

/// Errors produced while validating a candidate header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// Difficulty is missing or not one of the in-turn / out-of-turn sentinels.
    #[error("Invalid authority difficulty: expected 1 or 2, got {got:?}")]
    InvalidDifficulty {
        /// The difficulty carried by the header, if any.
        got: Option<U256>,
    },
    /// The external authority engine rejected the header.
    #[error("Authority validation failed: {0}")]
    AuthorityViolation(#[from] AuthorityError),
    /// The parent header is not known yet.
    #[error("Unknown ancestor {parent_hash} for block {number}")]
    UnknownAncestor {
        /// Parent hash referenced by the header.
        parent_hash: B256,
        /// Number of the header whose parent is missing.
        number: u64,
    },
    /// A structural rule of the stake mechanism failed.
    #[error("Header field {field} violates {requirement}: {detail}")]
    StakeFieldViolation {
        /// The offending field.
        field: HeaderField,
        /// The rule that failed.
        requirement: String,
        /// Human-readable description of the mismatch.
        detail: String,
    },
    /// A fork-gated field is present before its fork, or absent after it.
    #[error("Header field {field} must be {expected} under fork {fork}")]
    ForkConsistency {
        /// The offending field.
        field: HeaderField,
        /// The fork active for the header.
        fork: Fork,
        /// What the active fork requires.
        expected: Presence,
    },
    /// The block carries uncles, which neither mechanism allows.
    #[error("Uncles not allowed, block carries {0}")]
    UnclesNotAllowed(usize),
}

impl HeaderError {
    /// Classifies the rejection by the mechanism that raised it.
    pub fn mechanism(&self) -> Mechanism {
        match self {
            Self::InvalidDifficulty { .. } | Self::AuthorityViolation(_) => Mechanism::Authority,
            Self::UnknownAncestor { .. } => Mechanism::Ancestry,
            Self::StakeFieldViolation { .. } | Self::UnclesNotAllowed(_) => Mechanism::Stake,
            Self::ForkConsistency { .. } => Mechanism::ForkConsistency,
        }
    }

    /// True when the header may become valid once its parent is imported.
    pub fn awaits_parent(&self) -> bool {
        matches!(self, Self::UnknownAncestor { .. })
    }
}

impl ErrorCode for HeaderError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidDifficulty { .. } => "HEADER_INVALID_DIFFICULTY",
            Self::AuthorityViolation(_) => "HEADER_AUTHORITY_VIOLATION",
            Self::UnknownAncestor { .. } => "HEADER_UNKNOWN_ANCESTOR",
            Self::StakeFieldViolation { .. } => "HEADER_STAKE_FIELD_VIOLATION",
            Self::ForkConsistency { .. } => "HEADER_FORK_CONSISTENCY",
            Self::UnclesNotAllowed(_) => "HEADER_UNCLES_NOT_ALLOWED",
        }
    }
}

/// A header failed a fee-market or blob-fee recomputation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {detail}")]
pub struct FeeRuleViolation {
    /// The field whose value disagrees with the recomputation.
    pub field: HeaderField,
    /// Expected and actual values.
    pub detail: String,
}

impl FeeRuleViolation {
    /// Convenience constructor.
    pub fn new(field: HeaderField, detail: impl Into<String>) -> Self {
        Self {
            field,
            detail: detail.into(),
        }
    }
}

/// Errors related to the incentive ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A delegation removal exceeds the validator's delegated stake.
    #[error("Insufficient delegation for {identity}: available {available}, requested {requested}")]
    InsufficientDelegation {
        /// The validator whose delegation was reduced.
        identity: Address,
        /// Delegated stake currently recorded.
        available: BigUint,
        /// Amount the caller tried to remove.
        requested: BigUint,
    },
    /// A record field does not fit in a 256-bit storage slot.
    #[error("Value of {field} needs {bits} bits and does not fit a 256-bit slot")]
    ValueOverflow {
        /// The field being written.
        field: RecordField,
        /// Bit length of the rejected value.
        bits: u64,
    },
}

impl ErrorCode for LedgerError {
    fn code(&self) -> &'static str {
        match self {
            Self::InsufficientDelegation { .. } => "LEDGER_INSUFFICIENT_DELEGATION",
            Self::ValueOverflow { .. } => "LEDGER_VALUE_OVERFLOW",
        }
    }
}

/// Errors related to block reward distribution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewardError {
    /// Reading or writing the proposer's record failed.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    /// The reward does not fit the balance unit and the overflow policy rejects it.
    #[error("Reward {reward} overflows the 256-bit balance unit")]
    RewardOverflow {
        /// The computed reward.
        reward: BigUint,
    },
}

impl ErrorCode for RewardError {
    fn code(&self) -> &'static str {
        match self {
            Self::Ledger(_) => "REWARD_LEDGER_ERROR",
            Self::RewardOverflow { .. } => "REWARD_OVERFLOW",
        }
    }
}

/// Errors related to proposer selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The candidate set is empty.
    #[error("No candidates available for proposer selection")]
    NoCandidates,
}

impl ErrorCode for SelectionError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoCandidates => "SELECTION_NO_CANDIDATES",
        }
    }
}

/// Errors building the system distribution transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// No validator public key was supplied.
    #[error("Validator public key is missing")]
    MissingPubkey,
    /// The validator public key has the wrong length.
    #[error("Malformed validator public key: expected {expected} bytes, got {got}")]
    MalformedPubkey {
        /// Required key length.
        expected: usize,
        /// Length of the supplied key.
        got: usize,
    },
    /// The current block number leaves no room for a `number - 1` nonce.
    #[error("Block number must be greater than zero, got {0}")]
    InvalidBlockNumber(u64),
}

impl ErrorCode for EncodingError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingPubkey => "ENCODING_MISSING_PUBKEY",
            Self::MalformedPubkey { .. } => "ENCODING_MALFORMED_PUBKEY",
            Self::InvalidBlockNumber(_) => "ENCODING_INVALID_BLOCK_NUMBER",
        }
    }
}

/// Errors raised by the optional minimum-stake validation stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakeRequirementError {
    /// The proposer's delegated stake is below the configured minimum.
    #[error("Validator {identity} has delegation {actual}, below the minimum {required}")]
    InsufficientDelegation {
        /// The proposer.
        identity: Address,
        /// Configured minimum.
        required: BigUint,
        /// Recorded delegation.
        actual: BigUint,
    },
    /// The proposer's liquidity stake is below the configured minimum.
    #[error("Validator {identity} has liquidity stake {actual}, below the minimum {required}")]
    InsufficientLiquidity {
        /// The proposer.
        identity: Address,
        /// Configured minimum.
        required: BigUint,
        /// Recorded liquidity stake.
        actual: BigUint,
    },
}

impl ErrorCode for StakeRequirementError {
    fn code(&self) -> &'static str {
        match self {
            Self::InsufficientDelegation { .. } => "STAKE_INSUFFICIENT_DELEGATION",
            Self::InsufficientLiquidity { .. } => "STAKE_INSUFFICIENT_LIQUIDITY",
        }
    }
}

/// Errors in static configuration, detected at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A fork is scheduled while one of its predecessors is not.
    #[error("Fork {fork} is scheduled but its predecessor {predecessor} is not")]
    MissingPredecessor {
        /// The scheduled fork.
        fork: Fork,
        /// The unscheduled predecessor.
        predecessor: Fork,
    },
    /// The reward normalization constant is zero.
    #[error("Reward normalization constant must be non-zero")]
    ZeroNormalization,
    /// The configured storage slot layout version is not known.
    #[error("Unsupported ledger slot layout version {0}")]
    UnsupportedSlotLayout(u8),
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingPredecessor { .. } => "CONFIG_MISSING_FORK_PREDECESSOR",
            Self::ZeroNormalization => "CONFIG_ZERO_NORMALIZATION",
            Self::UnsupportedSlotLayout(_) => "CONFIG_UNSUPPORTED_SLOT_LAYOUT",
        }
    }
}

/// The umbrella error of the combined engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Header validation failed.
    #[error(transparent)]
    Header(#[from] HeaderError),
    /// The authority engine failed outside header validation.
    #[error("Authority engine: {0}")]
    Authority(#[from] AuthorityError),
    /// The stake engine failed.
    #[error("Stake engine: {0}")]
    Finality(#[from] FinalityError),
    /// The incentive ledger failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// Reward distribution failed.
    #[error(transparent)]
    Reward(#[from] RewardError),
    /// Proposer selection failed.
    #[error(transparent)]
    Selection(#[from] SelectionError),
    /// The minimum-stake stage rejected the proposer.
    #[error(transparent)]
    StakeRequirement(#[from] StakeRequirementError),
}

impl ErrorCode for EngineError {
    fn code(&self) -> &'static str {
        match self {
            Self::Header(e) => e.code(),
            Self::Authority(e) => e.code(),
            Self::Finality(e) => e.code(),
            Self::Ledger(e) => e.code(),
            Self::Reward(e) => e.code(),
            Self::Selection(e) => e.code(),
            Self::StakeRequirement(e) => e.code(),
        }
    }
}
