// Path: crates/consensus/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! Hybrid consensus for the Tandem core.
//!
//! Every block must satisfy both the signer-rotation (authority) engine and the
//! structural rules of the stake engine, with the stake rules gated by the protocol
//! upgrades active at the header's number and timestamp. After the withdrawals
//! upgrade, block finalization also pays a delegation-weighted reward to the proposer.

pub mod common;
pub mod fees;
pub mod header;
pub mod hybrid;
pub mod ledger;
pub mod reward;
pub mod selector;
pub mod util;

pub use common::StakeRequirementStage;
pub use header::{
    Constraint, ConstraintMatrix, ConstraintSet, HeaderConstraintEngine, Recompute, Requirement,
};
pub use hybrid::HybridEngine;
pub use ledger::{IncentiveLedger, KeccakSlotPolicy, SlotPolicy};
pub use reward::{Distribution, RewardEngine};
pub use selector::choose_proposer;
