//! Employee profiles of the signed-in account.

use async_trait::async_trait;

use crate::core::{Endpoints, HttpMethod, HttpTransport};
use crate::error::ClientResult;
use crate::services::ServiceContext;
use crate::session::CredentialIssuer;
use crate::types::{Employee, EmployeeInput};

#[async_trait]
pub trait EmployeeService: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<Employee>>;
    async fn get(&self, id: i64) -> ClientResult<Employee>;
    async fn create(&self, input: EmployeeInput) -> ClientResult<Employee>;
    async fn update(&self, id: i64, input: EmployeeInput) -> ClientResult<Employee>;
    async fn delete(&self, id: i64) -> ClientResult<()>;
}

pub struct EmployeeServiceImpl<T: HttpTransport, I: CredentialIssuer> {
    context: ServiceContext<T, I>,
}

impl<T: HttpTransport, I: CredentialIssuer> EmployeeServiceImpl<T, I> {
    pub fn new(context: ServiceContext<T, I>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl<T: HttpTransport, I: CredentialIssuer> EmployeeService for EmployeeServiceImpl<T, I> {
    async fn list(&self) -> ClientResult<Vec<Employee>> {
        self.context.fetch(HttpMethod::Get, Endpoints::EMPLOYEES).await
    }

    async fn get(&self, id: i64) -> ClientResult<Employee> {
        self.context
            .fetch(HttpMethod::Get, &Endpoints::employee(id))
            .await
    }

    async fn create(&self, input: EmployeeInput) -> ClientResult<Employee> {
        self.context
            .submit(HttpMethod::Post, Endpoints::EMPLOYEE, &input)
            .await
    }

    async fn update(&self, id: i64, input: EmployeeInput) -> ClientResult<Employee> {
        self.context
            .submit(HttpMethod::Patch, &Endpoints::employee(id), &input)
            .await
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        self.context
            .send(HttpMethod::Delete, &Endpoints::employee(id))
            .await?;
        Ok(())
    }
}
