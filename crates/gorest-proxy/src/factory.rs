//! Construction of the upstream user directory

use std::sync::Arc;

use eyre::{Result, WrapErr};
use gorest_client::{GoRestClient, UserDirectory};

use crate::config::Config;

/// Build the user directory backing the proxy from configuration
///
/// # Errors
/// Returns error if no token is configured or the HTTP client cannot be built
pub fn build_directory(config: &Config) -> Result<Arc<dyn UserDirectory>> {
    let client_config = config.client_config()?;
    tracing::info!(
        base_url = %client_config.base_url,
        timeout_secs = client_config.timeout.as_secs(),
        retry_attempts = client_config.retry.max_attempts,
        "creating upstream client"
    );

    let client = GoRestClient::new(client_config).wrap_err("failed to create upstream client")?;
    Ok(Arc::new(client))
}
