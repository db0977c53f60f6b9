// Path: crates/tx/src/lib.rs
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
//! System-originated transactions.

pub mod system;

pub use system::distribution::{is_distribution_call, DistributionTrigger};
pub use tandem_types::app::SystemDistributionTx;
