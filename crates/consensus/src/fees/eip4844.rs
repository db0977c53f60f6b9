// Path: crates/consensus/src/fees/eip4844.rs
use tandem_types::app::fees::calc_excess_blob_gas;
use tandem_types::app::{Header, HeaderField};
use tandem_types::config::ChainSpec;
use tandem_types::error::FeeRuleViolation;
use tandem_types::keys::{BLOB_GAS_PER_BLOB, MAX_BLOB_GAS_PER_BLOCK};

/// Checks the blob gas accounting of a blob-fork header against its parent.
pub fn verify_header(
    spec: &ChainSpec,
    parent: &Header,
    header: &Header,
) -> Result<(), FeeRuleViolation> {
    let Some(excess_blob_gas) = header.excess_blob_gas else {
        return Err(FeeRuleViolation::new(
            HeaderField::ExcessBlobGas,
            "header is missing excess blob gas",
        ));
    };
    let Some(blob_gas_used) = header.blob_gas_used else {
        return Err(FeeRuleViolation::new(
            HeaderField::BlobGasUsed,
            "header is missing blob gas used",
        ));
    };
    if blob_gas_used > MAX_BLOB_GAS_PER_BLOCK {
        return Err(FeeRuleViolation::new(
            HeaderField::BlobGasUsed,
            format!("blob gas used {blob_gas_used} exceeds maximum allowance {MAX_BLOB_GAS_PER_BLOCK}"),
        ));
    }
    if blob_gas_used % BLOB_GAS_PER_BLOB != 0 {
        return Err(FeeRuleViolation::new(
            HeaderField::BlobGasUsed,
            format!("blob gas used {blob_gas_used} not a multiple of blob gas per blob {BLOB_GAS_PER_BLOB}"),
        ));
    }
    let expected = calc_excess_blob_gas(spec, parent);
    if excess_blob_gas != expected {
        return Err(FeeRuleViolation::new(
            HeaderField::ExcessBlobGas,
            format!(
                "invalid excess blob gas: have {excess_blob_gas}, want {expected}, parent excess {:?}, parent used {:?}",
                parent.excess_blob_gas, parent.blob_gas_used
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cancun_parent() -> Header {
        Header {
            number: 1,
            timestamp: 12,
            blob_gas_used: Some(6 * BLOB_GAS_PER_BLOB),
            excess_blob_gas: Some(0),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_recomputed_excess() {
        let spec = ChainSpec::all_forks(1);
        let child = Header {
            blob_gas_used: Some(BLOB_GAS_PER_BLOB),
            excess_blob_gas: Some(3 * BLOB_GAS_PER_BLOB),
            ..Default::default()
        };
        assert!(verify_header(&spec, &cancun_parent(), &child).is_ok());
    }

    #[test]
    fn rejects_bad_blob_gas_used() {
        let spec = ChainSpec::all_forks(1);
        let mut child = Header {
            blob_gas_used: Some(7 * BLOB_GAS_PER_BLOB),
            excess_blob_gas: Some(3 * BLOB_GAS_PER_BLOB),
            ..Default::default()
        };
        assert_eq!(
            verify_header(&spec, &cancun_parent(), &child).unwrap_err().field,
            HeaderField::BlobGasUsed
        );
        child.blob_gas_used = Some(BLOB_GAS_PER_BLOB + 1);
        assert_eq!(
            verify_header(&spec, &cancun_parent(), &child).unwrap_err().field,
            HeaderField::BlobGasUsed
        );
    }

    #[test]
    fn rejects_missing_fields_and_wrong_excess() {
        let spec = ChainSpec::all_forks(1);
        let child = Header {
            blob_gas_used: Some(0),
            excess_blob_gas: Some(0),
            ..Default::default()
        };
        assert_eq!(
            verify_header(&spec, &cancun_parent(), &child).unwrap_err().field,
            HeaderField::ExcessBlobGas
        );
        let missing = Header {
            excess_blob_gas: Some(0),
            ..Default::default()
        };
        assert_eq!(
            verify_header(&spec, &cancun_parent(), &missing).unwrap_err().field,
            HeaderField::BlobGasUsed
        );
    }
}
