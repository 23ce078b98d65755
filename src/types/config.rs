//! Configuration Types
//!
//! Client configuration types.

use std::time::Duration;
use url::Url;

use crate::core::Endpoints;
use crate::error::{ClientResult, NetworkError};

/// Default backend location, including the API version prefix.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/api/v1/";
/// Default configuration values.
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Time-tracking client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL every endpoint path is resolved against. Always ends in `/`.
    pub base_url: Url,
    /// HTTP timeout.
    pub timeout: Duration,
    /// Largest response body accepted.
    pub max_response_size: usize,
    /// Session endpoint paths.
    pub session: SessionEndpoints,
    /// Extra paths that never take part in a session refresh.
    pub exempt_paths: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            session: SessionEndpoints::default(),
            exempt_paths: vec![
                Endpoints::REGISTER.to_string(),
                Endpoints::VALIDATE_ACCESS_TOKEN.to_string(),
            ],
        }
    }
}

impl ClientConfig {
    /// Resolve an endpoint path against the base URL.
    pub fn endpoint(&self, path: &str) -> ClientResult<String> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| NetworkError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
            })?;
        Ok(url.to_string())
    }
}

/// Paths of the credential endpoints, relative to the base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionEndpoints {
    pub login: String,
    pub refresh: String,
    pub logout: String,
}

impl Default for SessionEndpoints {
    fn default() -> Self {
        Self {
            login: "auth/login".to_string(),
            refresh: "auth/refresh".to_string(),
            logout: "auth/logout".to_string(),
        }
    }
}
