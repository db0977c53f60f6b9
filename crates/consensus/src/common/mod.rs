// Path: crates/consensus/src/common/mod.rs
//! Shared stages used by the hybrid engine.

pub mod stake_requirements;

pub use stake_requirements::StakeRequirementStage;
