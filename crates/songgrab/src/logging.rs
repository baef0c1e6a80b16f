use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use songgrab_core::{SonggrabError, SonggrabResult};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Sends `tracing` output to `path` (appending). `RUST_LOG` overrides the default `info` level.
pub fn init_logging(path: &Path) -> SonggrabResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| {
            SonggrabError::Io(format!("failed to open log file {}: {err}", path.display()))
        })?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .try_init()
        .map_err(|err| SonggrabError::Config(format!("failed to initialize logging: {err}")))
}
