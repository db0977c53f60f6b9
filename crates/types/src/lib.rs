// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
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

//! # Tandem Types
//!
//! The foundational library of the Tandem consensus core: headers, blocks, validator
//! records, the system distribution transaction, fork schedules, configuration, and
//! every error enum.
//!
//! ## Architectural Role
//!
//! As the base crate, `tandem-types` has minimal dependencies and is itself a
//! dependency of every other crate in the workspace. This keeps the dependency graph
//! acyclic and gives one canonical definition of shared types like `Header` and
//! `ValidatorRecord`.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::EngineError> = std::result::Result<T, E>;

/// Headers, blocks, validator records, and the distribution transaction.
pub mod app;
/// Fork schedule and engine configuration.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Well-known addresses, hashes, and protocol limits.
pub mod keys;
