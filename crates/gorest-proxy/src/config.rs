//! Configuration loading and types

use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{WrapErr, eyre};
use gorest_client::{ClientConfig, DEFAULT_BASE_URL, RetryPolicy};
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "GOREST_PROXY_CONFIG";
/// Environment variable overriding the upstream token
pub const TOKEN_ENV: &str = "GOREST_TOKEN";
/// Environment variable overriding the upstream base URL
pub const BASE_URL_ENV: &str = "GOREST_BASE_URL";
/// Environment variable overriding the bind address
pub const BIND_ENV: &str = "GOREST_PROXY_BIND";

/// Top-level configuration for the proxy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Local HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream GoREST settings
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Retry policy for upstream calls
    #[serde(default)]
    pub retry: RetryPolicy,
}

/// Local HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address and port to bind to
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_level: default_log_level(),
            log_json: false,
            cors_origins: Vec::new(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Upstream service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the upstream service
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token; usually supplied through `GOREST_TOKEN`
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    /// Overall request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Load from default paths or use defaults
    ///
    /// # Errors
    /// Returns error if a config file exists but cannot be loaded
    pub fn load_default() -> eyre::Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }

        let paths = [
            PathBuf::from("gorest-proxy.toml"),
            PathBuf::from("/etc/gorest-proxy/gorest-proxy.toml"),
            dirs::config_dir()
                .map(|p| p.join("gorest-proxy/gorest-proxy.toml"))
                .unwrap_or_default(),
        ];

        for path in paths {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load(&path);
            }
        }

        Ok(Config::default())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a variable lookup; empty values are ignored
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(token) = lookup(TOKEN_ENV) {
            self.upstream.token = Some(token);
        }
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            self.upstream.base_url = base_url;
        }
        if let Some(bind) = lookup(BIND_ENV) {
            self.server.bind = bind;
        }
    }

    /// Build the upstream client configuration
    ///
    /// # Errors
    /// Returns error if no upstream token is configured
    pub fn client_config(&self) -> eyre::Result<ClientConfig> {
        let token = self
            .upstream
            .token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                eyre!("no upstream token configured; set {TOKEN_ENV} or [upstream].token")
            })?;

        Ok(ClientConfig {
            base_url: self.upstream.base_url.clone(),
            token: token.to_string(),
            timeout: Duration::from_secs(self.upstream.timeout_secs),
            retry: self.retry.clone(),
        })
    }
}
