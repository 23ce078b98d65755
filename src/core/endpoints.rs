//! Resource endpoint paths, relative to the configured base URL.

use chrono::NaiveDate;

/// Backend resource endpoints.
pub struct Endpoints;

impl Endpoints {
    pub const REGISTER: &'static str = "auth/register";
    pub const VALIDATE_ACCESS_TOKEN: &'static str = "auth/validate-access-token";

    pub const EMPLOYEES: &'static str = "admin/employees";
    pub const EMPLOYEE: &'static str = "admin/employee";

    pub const ACTIVITY_START: &'static str = "activity/start";
    pub const ACTIVITY_ALL: &'static str = "activity/all";

    pub fn employee(id: i64) -> String {
        format!("{}/{}", Self::EMPLOYEE, id)
    }

    pub fn activity(id: i64) -> String {
        format!("activity/{}", id)
    }

    pub fn activity_end(id: i64) -> String {
        format!("activity/end/{}", id)
    }

    /// Activities of one employee. Shares its shape with [`Endpoints::activity`].
    pub fn employee_activities(employee_id: i64) -> String {
        format!("activity/{}", employee_id)
    }

    pub fn daily_overview(date: Option<NaiveDate>) -> String {
        with_date("activity/statistics/daily", "date", date)
    }

    pub fn weekly_overview(start_date: Option<NaiveDate>) -> String {
        with_date("activity/statistics/weekly", "startDate", start_date)
    }

    pub fn export(employee_id: i64) -> String {
        format!("activity/statistics/{}/export", employee_id)
    }
}

fn with_date(path: &str, key: &str, date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!(
            "{}?{}={}",
            path,
            key,
            urlencoding::encode(&date.format("%Y-%m-%d").to_string())
        ),
        None => path.to_string(),
    }
}
