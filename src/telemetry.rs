use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with the specified log level.
///
/// `RUST_LOG` wins over `log_level` when set. Intervention decisions are
/// emitted at `info`, per-node detail at `debug`.
pub fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to create env filter")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(env_filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
