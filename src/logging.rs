use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter, e.g. `LCT_LOG=debug`.
pub const LOG_ENV: &str = "LCT_LOG";

/// Diagnostics go to stderr so stdout stays clean for `--json` output.
pub fn init() -> Result<()> {
    let level = std::env::var(LOG_ENV).unwrap_or_else(|_| "warn".to_string());
    let filter = EnvFilter::try_new(&level)
        .or_else(|_| EnvFilter::try_new("warn"))
        .context("Failed to create log filter")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .context("Failed to install log subscriber")?;
    Ok(())
}
