// Path: crates/api/src/lib.rs
//! # Tandem API Crate Lints
//!
//! This crate enforces a strict set of lints to ensure panic-free code. Panics are
//! disallowed in non-test code to promote robust error handling.
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
//! # Tandem API
//!
//! The stable contract between the hybrid engine and the collaborators it consumes
//! but never implements: the signer-rotation engine, the stake engine, the state
//! store, the header chain, and the fee recomputation rules.

/// Read access to the local header chain.
pub mod chain;
/// Capability traits of the two composed consensus engines.
pub mod consensus;
/// Fee-market and blob-fee recomputation rules.
pub mod fees;
/// The slot-addressed state store and balance ledger.
pub mod state;
