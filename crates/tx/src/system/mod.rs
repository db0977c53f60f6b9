// Path: crates/tx/src/system/mod.rs
//! Transactions the protocol injects on its own behalf.

pub mod abi;
pub mod distribution;
