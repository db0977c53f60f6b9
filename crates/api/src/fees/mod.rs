// Path: crates/api/src/fees/mod.rs
//! Defines the `FeeRules` trait: recomputation of the header fields that are derived
//! from the parent under the fee-market and blob-fee upgrades.

use tandem_types::app::Header;
use tandem_types::config::ChainSpec;
use tandem_types::error::FeeRuleViolation;

/// Recomputes fee-derived header fields from the parent and compares them.
pub trait FeeRules: Send + Sync {
    /// Gas-limit drift and base fee. Called only once the fee-market fork is active.
    fn verify_fee_market(
        &self,
        spec: &ChainSpec,
        parent: &Header,
        header: &Header,
    ) -> Result<(), FeeRuleViolation>;

    /// Blob gas used and excess blob gas. Called only once the blob-fee fork is active.
    fn verify_blob_fee(
        &self,
        spec: &ChainSpec,
        parent: &Header,
        header: &Header,
    ) -> Result<(), FeeRuleViolation>;
}
