//! Request plumbing shared by the resource services.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::core::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::error::ClientResult;
use crate::session::{CredentialIssuer, SessionCoordinator};
use crate::types::ClientConfig;

/// Configuration and coordinator handed to every service.
pub struct ServiceContext<T: HttpTransport, I: CredentialIssuer> {
    config: Arc<ClientConfig>,
    coordinator: Arc<SessionCoordinator<T, I>>,
}

impl<T: HttpTransport, I: CredentialIssuer> Clone for ServiceContext<T, I> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            coordinator: self.coordinator.clone(),
        }
    }
}

impl<T: HttpTransport, I: CredentialIssuer> ServiceContext<T, I> {
    pub fn new(config: Arc<ClientConfig>, coordinator: Arc<SessionCoordinator<T, I>>) -> Self {
        Self {
            config,
            coordinator,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &Arc<SessionCoordinator<T, I>> {
        &self.coordinator
    }

    /// Build a request for `path` relative to the base URL.
    pub fn request(&self, method: HttpMethod, path: &str) -> ClientResult<HttpRequest> {
        let url = self.config.endpoint(path)?;
        Ok(HttpRequest::new(method, url)
            .header("Accept", "application/json")
            .timeout(self.config.timeout))
    }

    /// Send a request without a body and return the raw response.
    pub async fn send(&self, method: HttpMethod, path: &str) -> ClientResult<HttpResponse> {
        let request = self.request(method, path)?;
        self.coordinator.dispatch(request).await
    }

    /// Send a request without a body and decode the JSON response.
    pub async fn fetch<R: DeserializeOwned>(&self, method: HttpMethod, path: &str) -> ClientResult<R> {
        self.send(method, path).await?.json()
    }

    /// Send a JSON body and decode the JSON response.
    pub async fn submit<B, R>(&self, method: HttpMethod, path: &str, body: &B) -> ClientResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let request = self.request(method, path)?.json(body)?;
        self.coordinator.dispatch(request).await?.json()
    }
}
