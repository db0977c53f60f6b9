// Path: crates/test_utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Tandem Test Utilities
//!
//! In-memory collaborators, header fixtures, and assertion macros for testing the
//! hybrid consensus core.

pub mod assertions;
pub mod fixtures;
pub mod mocks;
pub mod randomness;
