//! Builders
//!
//! Fluent builder for client configuration.

pub mod config;

pub use config::{client_config, ClientConfigBuilder, ENV_BACKEND_URL, ENV_TIMEOUT_SECS};
