// Path: crates/consensus/src/fees/mod.rs
//! The standard fee-market and blob-fee recomputation rules.

pub mod eip1559;
pub mod eip4844;

use tandem_api::fees::FeeRules;
use tandem_types::app::Header;
use tandem_types::config::ChainSpec;
use tandem_types::error::FeeRuleViolation;

/// Gas-limit drift plus EIP-1559 base fee, and EIP-4844 blob accounting.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFeeRules;

impl FeeRules for StandardFeeRules {
    fn verify_fee_market(
        &self,
        spec: &ChainSpec,
        parent: &Header,
        header: &Header,
    ) -> Result<(), FeeRuleViolation> {
        eip1559::verify_header(spec, parent, header)
    }

    fn verify_blob_fee(
        &self,
        spec: &ChainSpec,
        parent: &Header,
        header: &Header,
    ) -> Result<(), FeeRuleViolation> {
        eip4844::verify_header(spec, parent, header)
    }
}
