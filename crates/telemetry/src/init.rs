// Path: crates/telemetry/src/init.rs
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Initializes the global `tracing` subscriber for structured JSON logging.
///
/// `RUST_LOG` takes precedence; without it everything at `info` and above is emitted.
pub fn init_tracing() -> Result<(), anyhow::Error> {
    init_tracing_with_default("info")
}

/// Like [`init_tracing`], with a caller-chosen directive for when `RUST_LOG` is unset,
/// e.g. `"consensus=debug,ledger=debug,info"`.
pub fn init_tracing_with_default(default_directive: &str) -> Result<(), anyhow::Error> {
    let fmt_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))?;
    let subscriber = Registry::default().with(filter).with(fmt_layer);
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installs_once() {
        init_tracing_with_default("consensus=debug,info").unwrap();
        tracing::info!(target: "consensus", "subscriber installed");
        assert!(init_tracing().is_err());
    }
}
