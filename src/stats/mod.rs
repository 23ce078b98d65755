//! Activity Statistics
//!
//! Local aggregation over fetched activities, independent of the backend's
//! own statistics endpoints.

pub mod duration;
pub mod summary;

pub use duration::{format_duration, workday_share, WORKDAY_HOURS};
pub use summary::{
    activities_on, report_rows, summarize_by_day, DailySummary, ReportRow, WeeklySummary,
};
