// Path: crates/types/src/app/mod.rs
//! Core application-level data structures: headers, blocks, validator records, and
//! the system distribution transaction.

mod block;
pub mod fees;
mod header;
mod transaction;
mod validator;

pub use block::{Block, BlockBody, Withdrawal};
pub use header::{FieldValue, Header, HeaderField};
pub use transaction::SystemDistributionTx;
pub use validator::{RecordField, ValidatorRecord};

/// Why an account balance changed, for audit and trace consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceChangeReason {
    /// Reward credited to a block proposer.
    BlockReward,
    /// Withdrawal credited by the stake engine.
    Withdrawal,
}
