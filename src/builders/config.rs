//! Configuration Builder
//!
//! Fluent builder for client configuration.

use std::time::Duration;
use url::Url;

use crate::error::{ClientError, ConfigurationError};
use crate::types::{
    ClientConfig, SessionEndpoints, DEFAULT_BASE_URL, DEFAULT_MAX_RESPONSE_SIZE,
    DEFAULT_TIMEOUT_MS,
};

/// Environment variable holding the backend URL (API prefix included).
pub const ENV_BACKEND_URL: &str = "TIMETRACK_BACKEND_URL";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "TIMETRACK_TIMEOUT_SECS";

/// Client configuration builder.
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Duration,
    max_response_size: usize,
    session: SessionEndpoints,
    exempt_paths: Vec<String>,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        let defaults = ClientConfig::default();
        Self {
            base_url: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            session: defaults.session,
            exempt_paths: defaults.exempt_paths,
        }
    }

    /// Start from the process environment.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_env_vars(|key| std::env::var(key).ok())
    }

    /// Start from an arbitrary variable lookup.
    pub fn from_env_vars<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::new();

        if let Some(url) = lookup(ENV_BACKEND_URL) {
            builder = builder.base_url(url);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ClientError::Configuration(ConfigurationError::InvalidConfig {
                    message: format!("{} must be a whole number of seconds, got {:?}", ENV_TIMEOUT_SECS, raw),
                })
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(builder)
    }

    /// Set the backend base URL, e.g. `https://tracker.example.com/api/v1`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the largest accepted response body.
    pub fn max_response_size(mut self, bytes: usize) -> Self {
        self.max_response_size = bytes;
        self
    }

    /// Override the session endpoint paths.
    pub fn session_endpoints(mut self, endpoints: SessionEndpoints) -> Self {
        self.session = endpoints;
        self
    }

    /// Exclude another path from session refresh.
    pub fn exempt_path(mut self, path: impl Into<String>) -> Self {
        self.exempt_paths.push(path.into());
        self
    }

    /// Replace the exempt path list.
    pub fn exempt_paths(mut self, paths: Vec<String>) -> Self {
        self.exempt_paths = paths;
        self
    }

    /// Build the client configuration.
    pub fn build(self) -> Result<ClientConfig, ClientError> {
        let raw = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // Without the trailing slash `Url::join` would drop the last segment.
        let normalized = if raw.ends_with('/') {
            raw.clone()
        } else {
            format!("{}/", raw)
        };

        let base_url = Url::parse(&normalized).map_err(|_| {
            ClientError::Configuration(ConfigurationError::InvalidBaseUrl { url: raw.clone() })
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(
                ConfigurationError::InvalidBaseUrl { url: raw },
            ));
        }

        if self.timeout.is_zero() {
            return Err(ClientError::Configuration(ConfigurationError::InvalidConfig {
                message: "timeout must be greater than zero".to_string(),
            }));
        }

        for (field, value) in [
            ("session.login", &self.session.login),
            ("session.refresh", &self.session.refresh),
            ("session.logout", &self.session.logout),
        ] {
            if value.trim_matches('/').is_empty() {
                return Err(ClientError::Configuration(
                    ConfigurationError::MissingRequired {
                        field: field.to_string(),
                    },
                ));
            }
        }

        Ok(ClientConfig {
            base_url,
            timeout: self.timeout,
            max_response_size: self.max_response_size,
            session: self.session,
            exempt_paths: self.exempt_paths,
        })
    }
}

/// Create a new client configuration builder.
pub fn client_config() -> ClientConfigBuilder {
    ClientConfigBuilder::new()
}
