//! Metrics
//!
//! Session and request metrics interfaces and implementations.

use std::collections::HashMap;
use std::sync::Mutex;

/// Metric labels.
pub type MetricLabels = HashMap<String, String>;

pub const METRIC_REQUESTS: &str = "timetrack_requests_total";
pub const METRIC_REFRESH_STARTED: &str = "timetrack_session_refresh_started_total";
pub const METRIC_REFRESH_COMPLETED: &str = "timetrack_session_refresh_total";
pub const METRIC_REQUESTS_QUEUED: &str = "timetrack_requests_queued_total";
pub const METRIC_REQUESTS_REPLAYED: &str = "timetrack_requests_replayed_total";

/// Session metrics interface.
pub trait SessionMetrics: Send + Sync {
    /// Record a request that received a response.
    fn record_request(&self, method: &str, status: u16);

    /// Record the start of a refresh exchange.
    fn record_refresh_started(&self);

    /// Record a settled refresh exchange and how many queued requests it released.
    fn record_refresh(&self, success: bool, released: usize);

    /// Record a request parked behind an in-flight refresh.
    fn record_request_queued(&self);

    /// Record a request sent again after a refresh.
    fn record_request_replayed(&self, queued: bool);
}

/// No-op metrics implementation.
pub struct NoOpMetrics;

impl SessionMetrics for NoOpMetrics {
    fn record_request(&self, _method: &str, _status: u16) {}
    fn record_refresh_started(&self) {}
    fn record_refresh(&self, _success: bool, _released: usize) {}
    fn record_request_queued(&self) {}
    fn record_request_replayed(&self, _queued: bool) {}
}

/// No-op metrics singleton.
pub fn no_op_metrics() -> NoOpMetrics {
    NoOpMetrics
}

/// Metric entry for in-memory storage.
#[derive(Debug, Clone)]
pub struct MetricEntry {
    pub name: String,
    pub value: f64,
    pub labels: MetricLabels,
    pub timestamp: u64,
}

/// In-memory metrics for testing.
pub struct InMemoryMetrics {
    entries: Mutex<Vec<MetricEntry>>,
}

impl InMemoryMetrics {
    /// Create new in-memory metrics.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Get all recorded entries.
    pub fn get_entries(&self) -> Vec<MetricEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Get entries by name.
    pub fn get_entries_by_name(&self, name: &str) -> Vec<MetricEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.name == name)
            .cloned()
            .collect()
    }

    /// Sum of all values recorded under `name`.
    pub fn total(&self, name: &str) -> f64 {
        self.get_entries_by_name(name).iter().map(|e| e.value).sum()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    fn record(&self, name: &str, value: f64, labels: MetricLabels) {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        self.entries.lock().unwrap().push(MetricEntry {
            name: name.to_string(),
            value,
            labels,
            timestamp: now,
        });
    }
}

impl Default for InMemoryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMetrics for InMemoryMetrics {
    fn record_request(&self, method: &str, status: u16) {
        let mut labels = MetricLabels::new();
        labels.insert("method".to_string(), method.to_string());
        labels.insert("status".to_string(), status.to_string());
        self.record(METRIC_REQUESTS, 1.0, labels);
    }

    fn record_refresh_started(&self) {
        self.record(METRIC_REFRESH_STARTED, 1.0, MetricLabels::new());
    }

    fn record_refresh(&self, success: bool, released: usize) {
        let mut labels = MetricLabels::new();
        labels.insert("success".to_string(), success.to_string());
        labels.insert("released".to_string(), released.to_string());
        self.record(METRIC_REFRESH_COMPLETED, 1.0, labels);
    }

    fn record_request_queued(&self) {
        self.record(METRIC_REQUESTS_QUEUED, 1.0, MetricLabels::new());
    }

    fn record_request_replayed(&self, queued: bool) {
        let mut labels = MetricLabels::new();
        labels.insert("queued".to_string(), queued.to_string());
        self.record(METRIC_REQUESTS_REPLAYED, 1.0, labels);
    }
}

/// Create in-memory metrics for testing.
pub fn create_in_memory_metrics() -> InMemoryMetrics {
    InMemoryMetrics::new()
}
