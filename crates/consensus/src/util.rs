// Path: crates/consensus/src/util.rs
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tandem_api::consensus::{HeaderAuthority, HeaderFinality};
use tandem_types::config::HybridConfig;

use crate::HybridEngine;

/// Reads and validates a TOML engine configuration.
pub fn load_config(path: impl AsRef<Path>) -> Result<HybridConfig> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&raw).with_context(|| format!("invalid config file {}", path.display()))
}

pub fn parse_config(raw: &str) -> Result<HybridConfig> {
    let config: HybridConfig = toml::from_str(raw).context("failed to parse engine config")?;
    config.validate().context("engine config failed validation")?;
    Ok(config)
}

pub fn engine_from_config<A: HeaderAuthority, F: HeaderFinality>(
    config: &HybridConfig,
    authority: Arc<A>,
    finality: Arc<F>,
) -> Result<HybridEngine<A, F>> {
    tracing::info!(target: "consensus", %config, "Initializing hybrid authority/stake engine");
    HybridEngine::new(authority, finality, config).context("failed to build hybrid engine")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_test_utils::mocks::{MockAuthority, MockFinality};
    use tandem_types::config::{Activation, OverflowPolicy};

    const CONFIG: &str = r#"
        [chain]
        chain_id = 80084
        london = { block = 0 }
        shanghai = { timestamp = 0 }

        [incentives]
        base_reward = "20000000000000000"
        normalization = 500
        overflow_policy = "reject"

        [incentives.ledger]
        namespace = "0x0000000000000000000000000000000000000001"

        [distribution]
        distributor = "0x00000000000000000000000000000000000000d1"
    "#;

    #[test]
    fn parses_and_builds() {
        let config = parse_config(CONFIG).unwrap();
        assert_eq!(config.chain.chain_id, 80084);
        assert_eq!(config.chain.shanghai, Some(Activation::Timestamp(0)));
        assert_eq!(config.incentives.overflow_policy, OverflowPolicy::Reject);

        let engine = engine_from_config(
            &config,
            Arc::new(MockAuthority::new()),
            Arc::new(MockFinality::new()),
        )
        .unwrap();
        assert_eq!(engine.chain_spec().chain_id, 80084);
    }

    #[test]
    fn rejects_fork_without_predecessor() {
        let err = parse_config(
            r#"
            [chain]
            chain_id = 1
            cancun = { timestamp = 10 }
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("predecessor"));
    }

    #[test]
    fn rejects_unknown_slot_layout() {
        let config = parse_config(
            r#"
            [incentives.ledger]
            slot_layout = 9
            "#,
        )
        .unwrap();
        let result = engine_from_config(
            &config,
            Arc::new(MockAuthority::new()),
            Arc::new(MockFinality::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_config("/nonexistent/tandem.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
