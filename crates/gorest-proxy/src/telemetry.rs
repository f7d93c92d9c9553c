//! Tracing subscriber setup

use eyre::eyre;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::ServerConfig;

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured log level.
pub fn init_tracing(server: &ServerConfig) -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.clone()));

    let builder = fmt().with_env_filter(filter).with_target(false);

    if server.log_json {
        builder
            .json()
            .with_span_events(fmt::format::FmtSpan::CLOSE)
            .try_init()
            .map_err(|err| eyre!(err.to_string()))?;
    } else {
        builder
            .with_span_events(fmt::format::FmtSpan::CLOSE)
            .try_init()
            .map_err(|err| eyre!(err.to_string()))?;
    }

    Ok(())
}
