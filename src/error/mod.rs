//! Client Error Types
//!
//! Error hierarchy for the time-tracking client. Every fallible operation
//! returns [`ClientResult`], whose error is the root [`ClientError`].

use std::time::Duration;
use thiserror::Error;

/// Root error type for the time-tracking client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "TIMETRACK_CONFIG",
            Self::Authentication(_) => "TIMETRACK_AUTH",
            Self::Network(_) => "TIMETRACK_NETWORK",
            Self::Protocol(_) => "TIMETRACK_PROTOCOL",
            Self::Api(_) => "TIMETRACK_API",
            Self::Validation(_) => "TIMETRACK_VALIDATION",
        }
    }

    /// Check whether this is an expired-session response (HTTP 401) that a
    /// credential refresh may recover from.
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            Self::Authentication(AuthenticationError::SessionExpired { .. })
        )
    }

    /// Check if error requires the user to sign in again.
    pub fn needs_reauth(&self) -> bool {
        match self {
            Self::Authentication(e) => e.needs_reauth(),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication(AuthenticationError::SessionExpired { .. }) => Some(401),
            Self::Authentication(AuthenticationError::InvalidCredentials { .. }) => Some(401),
            Self::Authentication(AuthenticationError::RefreshFailed { status, .. }) => *status,
            Self::Api(e) => Some(e.status()),
            _ => None,
        }
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("HTTP client construction failed: {message}")]
    HttpClient { message: String },
}

/// Authentication and session error.
///
/// Cloneable so that one refresh failure can be handed to every request
/// queued behind it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Session expired for {url}")]
    SessionExpired { url: String },

    #[error("Session refresh failed: {message}")]
    RefreshFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Session refresh was abandoned before it settled")]
    RefreshAborted,

    #[error("Invalid credentials: {message}")]
    InvalidCredentials { message: String },

    #[error("Not signed in")]
    NotAuthenticated,
}

impl AuthenticationError {
    /// Check if error requires the user to sign in again.
    pub fn needs_reauth(&self) -> bool {
        match self {
            Self::SessionExpired { .. } => true,
            Self::RefreshFailed { .. } => true,
            Self::RefreshAborted => false,
            Self::InvalidCredentials { .. } => true,
            Self::NotAuthenticated => true,
        }
    }

    /// Collapse any client error raised during a refresh exchange into the
    /// shared refresh failure.
    pub fn from_refresh_error(error: &ClientError) -> Self {
        match error {
            ClientError::Authentication(AuthenticationError::RefreshFailed { status, message }) => {
                Self::RefreshFailed {
                    status: *status,
                    message: message.clone(),
                }
            }
            other => Self::RefreshFailed {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Invalid request URL: {url}")]
    InvalidUrl { url: String },
}

/// Protocol/response parsing error.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Unexpected redirect to: {location}")]
    UnexpectedRedirect { location: String },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// Error status returned by a resource endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected status {status}: {message}")]
    Unexpected { status: u16, message: String },
}

impl ApiError {
    /// HTTP status the error was created from.
    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest { .. } => 400,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Server { status, .. } | Self::Unexpected { status, .. } => *status,
        }
    }

    /// Server-provided message.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::Server { message, .. }
            | Self::Unexpected { message, .. } => message,
        }
    }
}

/// Local input validation error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid {field}: {}", .reasons.join("; "))]
    Invalid { field: String, reasons: Vec<String> },
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Error body produced by the backend.
///
/// `message` is either a single string or, for DTO validation failures, a
/// list of strings.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Flatten the message field into one line.
    pub fn message_text(&self) -> Option<String> {
        match &self.message {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|item| match item {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            Some(other) => Some(other.to_string()),
            None => self.error.clone(),
        }
    }
}

/// Parse error body from HTTP response bytes.
pub fn parse_error_body(body: &[u8]) -> Option<ErrorBody> {
    serde_json::from_slice(body).ok()
}

/// Create error from a non-success HTTP response.
pub fn create_error_from_response(status: u16, url: &str, body: &[u8]) -> ClientError {
    let message = parse_error_body(body)
        .and_then(|b| b.message_text())
        .unwrap_or_else(|| format!("HTTP {}", status));

    match status {
        401 => ClientError::Authentication(AuthenticationError::SessionExpired {
            url: url.to_string(),
        }),
        400 => ApiError::BadRequest { message }.into(),
        403 => ApiError::Forbidden { message }.into(),
        404 => ApiError::NotFound { message }.into(),
        409 => ApiError::Conflict { message }.into(),
        500..=599 => ApiError::Server { status, message }.into(),
        _ => ApiError::Unexpected { status, message }.into(),
    }
}

/// Get user-friendly error message.
pub fn get_user_message(error: &ClientError) -> String {
    match error {
        ClientError::Authentication(AuthenticationError::SessionExpired { .. })
        | ClientError::Authentication(AuthenticationError::RefreshFailed { .. }) => {
            "Your session has expired. Please sign in again.".to_string()
        }
        ClientError::Authentication(AuthenticationError::InvalidCredentials { .. }) => {
            "Username or password is incorrect.".to_string()
        }
        ClientError::Authentication(AuthenticationError::NotAuthenticated) => {
            "Please sign in to continue.".to_string()
        }
        ClientError::Network(NetworkError::Timeout { .. }) => {
            "The request timed out. Please check your connection and try again.".to_string()
        }
        ClientError::Validation(e) => e.to_string(),
        ClientError::Api(ApiError::NotFound { message })
        | ClientError::Api(ApiError::Conflict { message })
        | ClientError::Api(ApiError::BadRequest { message }) => message.clone(),
        ClientError::Api(ApiError::Server { .. }) => {
            "The time-tracking service is temporarily unavailable. Please try again later."
                .to_string()
        }
        _ => "Something went wrong. Please try again.".to_string(),
    }
}
