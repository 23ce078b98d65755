//! Activity tracking and server-side statistics.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::{Endpoints, HttpMethod, HttpTransport};
use crate::error::ClientResult;
use crate::services::ServiceContext;
use crate::session::CredentialIssuer;
use crate::types::{Activity, StartActivity, UpdateActivity};

/// Activity service interface.
#[async_trait]
pub trait ActivityService: Send + Sync {
    /// Start an activity for an employee.
    async fn start(&self, request: StartActivity) -> ClientResult<Activity>;

    /// Stop a running activity.
    async fn end(&self, id: i64) -> ClientResult<Activity>;

    /// All activities of the signed-in account.
    async fn all(&self) -> ClientResult<Vec<Activity>>;

    async fn for_employee(&self, employee_id: i64) -> ClientResult<Vec<Activity>>;

    async fn update(&self, id: i64, request: UpdateActivity) -> ClientResult<Activity>;

    async fn delete(&self, id: i64) -> ClientResult<()>;

    /// Backend's overview of one day. Today when `date` is `None`.
    ///
    /// The shape is backend-defined and returned as-is.
    async fn daily_overview(&self, date: Option<NaiveDate>) -> ClientResult<serde_json::Value>;

    /// Backend's overview of the week starting at `start_date`.
    async fn weekly_overview(&self, start_date: Option<NaiveDate>)
        -> ClientResult<serde_json::Value>;

    /// Spreadsheet export of one employee's activities, as raw bytes.
    async fn export(&self, employee_id: i64) -> ClientResult<Vec<u8>>;
}

/// Activity service implementation.
pub struct ActivityServiceImpl<T: HttpTransport, I: CredentialIssuer> {
    context: ServiceContext<T, I>,
}

impl<T: HttpTransport, I: CredentialIssuer> ActivityServiceImpl<T, I> {
    pub fn new(context: ServiceContext<T, I>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl<T: HttpTransport, I: CredentialIssuer> ActivityService for ActivityServiceImpl<T, I> {
    async fn start(&self, request: StartActivity) -> ClientResult<Activity> {
        self.context
            .submit(HttpMethod::Post, Endpoints::ACTIVITY_START, &request)
            .await
    }

    async fn end(&self, id: i64) -> ClientResult<Activity> {
        self.context
            .fetch(HttpMethod::Post, &Endpoints::activity_end(id))
            .await
    }

    async fn all(&self) -> ClientResult<Vec<Activity>> {
        self.context
            .fetch(HttpMethod::Get, Endpoints::ACTIVITY_ALL)
            .await
    }

    async fn for_employee(&self, employee_id: i64) -> ClientResult<Vec<Activity>> {
        self.context
            .fetch(HttpMethod::Get, &Endpoints::employee_activities(employee_id))
            .await
    }

    async fn update(&self, id: i64, request: UpdateActivity) -> ClientResult<Activity> {
        self.context
            .submit(HttpMethod::Patch, &Endpoints::activity(id), &request)
            .await
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        self.context
            .send(HttpMethod::Delete, &Endpoints::activity(id))
            .await?;
        Ok(())
    }

    async fn daily_overview(&self, date: Option<NaiveDate>) -> ClientResult<serde_json::Value> {
        self.context
            .fetch(HttpMethod::Get, &Endpoints::daily_overview(date))
            .await
    }

    async fn weekly_overview(
        &self,
        start_date: Option<NaiveDate>,
    ) -> ClientResult<serde_json::Value> {
        self.context
            .fetch(HttpMethod::Get, &Endpoints::weekly_overview(start_date))
            .await
    }

    async fn export(&self, employee_id: i64) -> ClientResult<Vec<u8>> {
        let response = self
            .context
            .send(HttpMethod::Get, &Endpoints::export(employee_id))
            .await?;
        Ok(response.body)
    }
}
