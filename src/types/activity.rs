//! Activity Types
//!
//! Time-tracking activity records and the request bodies that create or
//! modify them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of logged activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Work,
    Break,
    Wc,
    Smoke,
    Free,
}

impl ActivityType {
    /// Every activity type, in display order.
    pub const ALL: [ActivityType; 5] = [
        ActivityType::Work,
        ActivityType::Break,
        ActivityType::Wc,
        ActivityType::Smoke,
        ActivityType::Free,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "WORK",
            Self::Break => "BREAK",
            Self::Wc => "WC",
            Self::Smoke => "SMOKE",
            Self::Free => "FREE",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Break => "Break",
            Self::Wc => "WC",
            Self::Smoke => "Smoking",
            Self::Free => "Free time",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown activity type: {}", s))
    }
}

/// Logged activity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub employee_id: i64,
}

impl Activity {
    /// Whether the activity has not been ended yet.
    pub fn is_running(&self) -> bool {
        self.end_time.is_none()
    }

    /// Elapsed time; a running activity is measured up to `now`.
    ///
    /// Never negative, even when clocks disagree.
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        let end = self.end_time.unwrap_or(now);
        (end - self.start_time).max(Duration::zero())
    }
}

/// Body of `POST activity/start`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartActivity {
    pub activity_type: ActivityType,
    pub employee_id: i64,
}

impl StartActivity {
    pub fn new(activity_type: ActivityType, employee_id: i64) -> Self {
        Self {
            activity_type,
            employee_id,
        }
    }
}

/// Body of `PATCH activity/:id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivity {
    pub activity_type: ActivityType,
    pub employee_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}
