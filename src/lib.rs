//! Time-Tracking Client
//!
//! Async client for the employee time-tracking backend, with transparent
//! session refresh.
//!
//! # Features
//!
//! - Cookie-based sign-in, registration and sign-out
//! - Employee profile management
//! - Activity tracking, backend statistics and spreadsheet export
//! - Session refresh: a single in-flight refresh per expiry, with parked
//!   requests replayed in arrival order
//! - Local per-day and per-week activity totals
//!
//! # Example
//!
//! ```rust,ignore
//! use timetrack_client::{client_config, time_track_client, LoginRequest};
//! use timetrack_client::services::{ActivityService, AuthService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     timetrack_client::init_tracing("timetrack_client=info");
//!
//!     let config = client_config()
//!         .base_url("http://localhost:4000/api/v1")
//!         .build()?;
//!     let client = time_track_client(config)?;
//!
//!     client
//!         .auth()
//!         .login(LoginRequest::new("jdoe", "Sup3r-secret!").remember_me(true))
//!         .await?;
//!
//!     // A 401 here triggers one refresh; the call is then replayed.
//!     for activity in client.activities().all().await? {
//!         println!("{} {}", activity.id, activity.activity_type.label());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: wire types and client configuration
//! - `error`: error hierarchy and HTTP error mapping
//! - `core`: HTTP transport and endpoint paths
//! - `session`: session refresh coordinator, retry eligibility, credential issuer
//! - `services`: auth, employee and activity services
//! - `stats`: local activity aggregation
//! - `validation`: sign-in and registration form rules
//! - `telemetry`: logging and metrics
//! - `builders`: fluent configuration builder
//! - `client`: high-level client combining all functionality

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod services;
pub mod session;
pub mod stats;
pub mod telemetry;
pub mod types;
pub mod validation;

// Re-export main client
pub use client::{time_track_client, TimeTrackClient};

// Re-export builders
pub use builders::{client_config, ClientConfigBuilder};

// Re-export errors
pub use error::{
    create_error_from_response, get_user_message, parse_error_body, ApiError,
    AuthenticationError, ClientError, ClientResult, ConfigurationError, ErrorBody, NetworkError,
    ProtocolError, ValidationError,
};

// Re-export types
pub use types::{
    // Activity
    Activity, ActivityType, StartActivity, UpdateActivity,
    // Employee
    Employee, EmployeeInput, Gender,
    // User
    LoginRequest, RegisterRequest, User,
    // Config
    ClientConfig, SessionEndpoints,
};

// Re-export core components
pub use core::{
    Endpoints, HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport,
    ReqwestHttpTransport,
};

// Re-export session coordination
pub use session::{
    CredentialIssuer, HttpCredentialIssuer, MockCredentialIssuer, PendingRequest,
    RetryEligibility, SessionCoordinator,
};

// Re-export statistics
pub use stats::{format_duration, DailySummary, ReportRow, WeeklySummary};

// Re-export validation
pub use validation::{validate_login, validate_registration, PasswordStrength};

// Re-export telemetry
pub use telemetry::{
    // Logging
    create_in_memory_logger, create_tracing_logger, init_tracing, no_op_logger, InMemoryLogger,
    LogContext, LogEntry, LogLevel, Logger, NoOpLogger, TracingLogger,
    // Metrics
    create_in_memory_metrics, no_op_metrics, InMemoryMetrics, MetricEntry, MetricLabels,
    NoOpMetrics, SessionMetrics,
};
