//! Per-day and per-week activity totals.
//!
//! Activities are bucketed by the calendar day their start time falls on in
//! the caller's time zone. An activity spanning midnight counts in full on
//! the day it started. Running activities are measured up to `now`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::collections::BTreeMap;

use super::duration::workday_share;
use crate::types::{Activity, ActivityType, Employee};

fn local_date<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Activities started on `date` in `tz`, newest first.
pub fn activities_on<'a, Tz: TimeZone>(
    activities: &'a [Activity],
    date: NaiveDate,
    tz: &Tz,
) -> Vec<&'a Activity> {
    let mut found: Vec<&Activity> = activities
        .iter()
        .filter(|a| local_date(a.start_time, tz) == date)
        .collect();
    found.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    found
}

/// Totals per activity type for one day.
#[derive(Clone, Debug, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    totals: BTreeMap<ActivityType, Duration>,
    count: usize,
}

impl DailySummary {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            totals: BTreeMap::new(),
            count: 0,
        }
    }

    /// Summarize the activities started on `date`.
    pub fn for_date<Tz: TimeZone>(
        activities: &[Activity],
        date: NaiveDate,
        tz: &Tz,
        now: DateTime<Utc>,
    ) -> Self {
        let mut summary = Self::new(date);
        for activity in activities_on(activities, date, tz) {
            summary.add(activity, now);
        }
        summary
    }

    pub fn add(&mut self, activity: &Activity, now: DateTime<Utc>) {
        *self
            .totals
            .entry(activity.activity_type)
            .or_insert_with(Duration::zero) += activity.duration(now);
        self.count += 1;
    }

    /// Time spent on `activity_type`. Zero if none was logged.
    pub fn total(&self, activity_type: ActivityType) -> Duration {
        self.totals
            .get(&activity_type)
            .copied()
            .unwrap_or_else(Duration::zero)
    }

    /// Time across all types.
    pub fn total_tracked(&self) -> Duration {
        self.totals
            .values()
            .fold(Duration::zero(), |acc, d| acc + *d)
    }

    /// Number of activities counted.
    pub fn activity_count(&self) -> usize {
        self.count
    }

    /// Share of an 8-hour workday spent on `activity_type`, in percent.
    pub fn workday_progress(&self, activity_type: ActivityType) -> f64 {
        workday_share(self.total(activity_type))
    }

    /// Every type with its total, zero totals included.
    pub fn entries(&self) -> impl Iterator<Item = (ActivityType, Duration)> + '_ {
        ActivityType::ALL.into_iter().map(|t| (t, self.total(t)))
    }
}

/// Daily summaries keyed by local date, for every day with at least one activity.
pub fn summarize_by_day<Tz: TimeZone>(
    activities: &[Activity],
    tz: &Tz,
    now: DateTime<Utc>,
) -> BTreeMap<NaiveDate, DailySummary> {
    let mut days: BTreeMap<NaiveDate, DailySummary> = BTreeMap::new();
    for activity in activities {
        let date = local_date(activity.start_time, tz);
        days.entry(date)
            .or_insert_with(|| DailySummary::new(date))
            .add(activity, now);
    }
    days
}

/// Seven consecutive days starting at `week_start`.
#[derive(Clone, Debug, PartialEq)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub days: Vec<DailySummary>,
}

impl WeeklySummary {
    pub fn new<Tz: TimeZone>(
        activities: &[Activity],
        week_start: NaiveDate,
        tz: &Tz,
        now: DateTime<Utc>,
    ) -> Self {
        let mut by_day = summarize_by_day(activities, tz, now);
        let days = week_start
            .iter_days()
            .take(7)
            .map(|date| by_day.remove(&date).unwrap_or_else(|| DailySummary::new(date)))
            .collect();
        Self { week_start, days }
    }

    /// Summary of `date`, if it falls in this week.
    pub fn day(&self, date: NaiveDate) -> Option<&DailySummary> {
        self.days.iter().find(|d| d.date == date)
    }

    pub fn total(&self, activity_type: ActivityType) -> Duration {
        self.days
            .iter()
            .fold(Duration::zero(), |acc, d| acc + d.total(activity_type))
    }

    pub fn total_tracked(&self) -> Duration {
        self.days
            .iter()
            .fold(Duration::zero(), |acc, d| acc + d.total_tracked())
    }
}

/// One line of an activity report.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportRow {
    pub employee_id: i64,
    pub employee_name: String,
    pub date: NaiveDate,
    pub activity_type: ActivityType,
    pub start: NaiveDateTime,
    /// `None` while the activity is running.
    pub end: Option<NaiveDateTime>,
    pub duration: Duration,
}

/// Flatten the employees' embedded activities into report rows, ordered by
/// employee and start time. Times are local to `tz`.
pub fn report_rows<Tz: TimeZone>(
    employees: &[Employee],
    tz: &Tz,
    now: DateTime<Utc>,
) -> Vec<ReportRow> {
    let mut rows = Vec::new();
    for employee in employees {
        let mut activities: Vec<&Activity> = employee.activities.iter().collect();
        activities.sort_by_key(|a| a.start_time);

        let name = employee.full_name();
        rows.extend(activities.into_iter().map(|activity| {
            let start = activity.start_time.with_timezone(tz);
            ReportRow {
                employee_id: employee.id,
                employee_name: name.clone(),
                date: start.date_naive(),
                activity_type: activity.activity_type,
                start: start.naive_local(),
                end: activity
                    .end_time
                    .map(|end| end.with_timezone(tz).naive_local()),
                duration: activity.duration(now),
            }
        }));
    }
    rows
}
