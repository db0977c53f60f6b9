// Path: crates/test_utils/src/mocks/mod.rs
//! In-memory stand-ins for the collaborators the hybrid engine consumes.

mod chain;
mod engines;
mod state;

pub use chain::MemoryChain;
pub use engines::{EngineCall, Journal, MockAuthority, MockFinality};
pub use state::MemoryState;
