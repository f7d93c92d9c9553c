//! Application state shared across HTTP handlers

use std::sync::Arc;

use gorest_client::UserDirectory;

use crate::config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Upstream user directory
    pub directory: Arc<dyn UserDirectory>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(directory: Arc<dyn UserDirectory>, config: Config) -> Self {
        Self {
            directory,
            config: Arc::new(config),
        }
    }
}
