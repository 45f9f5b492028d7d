use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log to stderr so command output on stdout stays clean.
///
/// `RUST_LOG` wins over the configured `level`.
pub fn init_logging(level: &str) -> Result<()> {
    let default_filter =
        format!("gofinances={level},gofinances_store={level},gofinances_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()
        .map_err(|e| anyhow!("install log subscriber: {e}"))?;

    tracing::debug!(filter = %default_filter, "logging initialized");
    Ok(())
}
