// Path: crates/consensus/src/fees/eip1559.rs
use tandem_types::app::fees::calc_base_fee;
use tandem_types::app::{Header, HeaderField};
use tandem_types::config::ChainSpec;
use tandem_types::error::FeeRuleViolation;
use tandem_types::keys::{ELASTICITY_MULTIPLIER, GAS_LIMIT_BOUND_DIVISOR, MIN_GAS_LIMIT};

/// Checks the gas limit drift and the base fee of a fee-market header.
pub fn verify_header(
    spec: &ChainSpec,
    parent: &Header,
    header: &Header,
) -> Result<(), FeeRuleViolation> {
    // The first fee-market block keeps the gas target by doubling the limit.
    let parent_gas_limit = if spec.is_london(parent.number, parent.timestamp) {
        parent.gas_limit
    } else {
        parent.gas_limit.saturating_mul(ELASTICITY_MULTIPLIER)
    };
    verify_gas_limit(parent_gas_limit, header.gas_limit)?;

    let Some(base_fee) = header.base_fee_per_gas else {
        return Err(FeeRuleViolation::new(
            HeaderField::BaseFee,
            "header is missing base fee",
        ));
    };
    let expected = calc_base_fee(spec, parent);
    if base_fee != expected {
        return Err(FeeRuleViolation::new(
            HeaderField::BaseFee,
            format!(
                "invalid base fee: have {base_fee}, want {expected}, parent base fee {:?}, parent gas used {}",
                parent.base_fee_per_gas, parent.gas_used
            ),
        ));
    }
    Ok(())
}

/// The gas limit may move by less than 1/1024 of the parent's and never below the floor.
pub fn verify_gas_limit(parent_gas_limit: u64, gas_limit: u64) -> Result<(), FeeRuleViolation> {
    let diff = parent_gas_limit.abs_diff(gas_limit);
    let limit = parent_gas_limit / GAS_LIMIT_BOUND_DIVISOR;
    if diff >= limit {
        return Err(FeeRuleViolation::new(
            HeaderField::GasLimit,
            format!("invalid gas limit: have {gas_limit}, want {parent_gas_limit} +-= {}", limit.saturating_sub(1)),
        ));
    }
    if gas_limit < MIN_GAS_LIMIT {
        return Err(FeeRuleViolation::new(
            HeaderField::GasLimit,
            format!("invalid gas limit below {MIN_GAS_LIMIT}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_types::config::Activation;
    use tandem_types::keys::INITIAL_BASE_FEE;

    fn parent() -> Header {
        Header {
            number: 5,
            gas_limit: 30_000_000,
            gas_used: 15_000_000,
            base_fee_per_gas: Some(INITIAL_BASE_FEE),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_matching_base_fee() {
        let spec = ChainSpec::all_forks(1);
        let child = Header {
            number: 6,
            gas_limit: 30_000_000,
            base_fee_per_gas: Some(INITIAL_BASE_FEE),
            ..Default::default()
        };
        assert!(verify_header(&spec, &parent(), &child).is_ok());
    }

    #[test]
    fn rejects_wrong_or_missing_base_fee() {
        let spec = ChainSpec::all_forks(1);
        let mut child = Header {
            number: 6,
            gas_limit: 30_000_000,
            base_fee_per_gas: Some(INITIAL_BASE_FEE + 1),
            ..Default::default()
        };
        let err = verify_header(&spec, &parent(), &child).unwrap_err();
        assert_eq!(err.field, HeaderField::BaseFee);

        child.base_fee_per_gas = None;
        let err = verify_header(&spec, &parent(), &child).unwrap_err();
        assert_eq!(err.field, HeaderField::BaseFee);
    }

    #[test]
    fn gas_limit_drift_is_bounded() {
        assert!(verify_gas_limit(30_000_000, 30_029_295).is_ok());
        assert!(verify_gas_limit(30_000_000, 30_029_297).is_err());
        assert!(verify_gas_limit(30_000_000, 29_970_705).is_ok());
        assert!(verify_gas_limit(8_000, 4_999).is_err());
    }

    #[test]
    fn fork_block_doubles_parent_limit() {
        let spec = ChainSpec {
            london: Some(Activation::Block(6)),
            ..ChainSpec::default()
        };
        let mut pre = parent();
        pre.base_fee_per_gas = None;
        let child = Header {
            number: 6,
            gas_limit: 60_000_000,
            base_fee_per_gas: Some(INITIAL_BASE_FEE),
            ..Default::default()
        };
        assert!(verify_header(&spec, &pre, &child).is_ok());
    }
}
