//! Telemetry
//!
//! Observability components for client operations.
//!
//! This module provides:
//!
//! - **Logging**: Structured logging with context, forwarded to `tracing`
//! - **Metrics**: Request and session refresh counters

pub mod logging;
pub mod metrics;

// Logging
pub use logging::{
    create_in_memory_logger, create_tracing_logger, init_tracing, no_op_logger, InMemoryLogger,
    LogContext, LogEntry, LogLevel, Logger, NoOpLogger, TracingLogger,
};

// Metrics
pub use metrics::{
    create_in_memory_metrics, no_op_metrics, InMemoryMetrics, MetricEntry, MetricLabels,
    NoOpMetrics, SessionMetrics,
};
