//! Duration display helpers.

use chrono::Duration;

/// Length of a full workday.
pub const WORKDAY_HOURS: i64 = 8;

/// Format as `HH:MM:SS`. Hours are not wrapped at 24; negative input is
/// shown as zero.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Share of a workday covered by `duration`, in percent, capped at 100.
pub fn workday_share(duration: Duration) -> f64 {
    let workday = Duration::hours(WORKDAY_HOURS).num_milliseconds() as f64;
    let share = duration.num_milliseconds().max(0) as f64 / workday * 100.0;
    share.min(100.0)
}
