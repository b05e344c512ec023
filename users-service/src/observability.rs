//! Structured logging

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Install a JSON `fmt` subscriber filtered by `service.log_level`
///
/// A level that does not parse falls back to `info`. Calling this more than
/// once is harmless.
pub fn init_tracing(config: &Config) -> Result<()> {
    let log_level = config.service.log_level.clone();

    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            environment = %config.service.environment,
            "Tracing initialized for service: {}",
            config.service.name
        );
    } else {
        tracing::debug!("Tracing subscriber already installed");
    }

    Ok(())
}
