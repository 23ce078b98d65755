//! Time-Tracking Client
//!
//! High-level client wiring the transport, credential issuer, session
//! coordinator and resource services together.

use std::sync::Arc;

use crate::core::{create_transport, HttpRequest, HttpResponse, HttpTransport, ReqwestHttpTransport};
use crate::error::ClientResult;
use crate::services::{
    ActivityServiceImpl, AuthServiceImpl, EmployeeServiceImpl, ServiceContext,
};
use crate::session::{CredentialIssuer, HttpCredentialIssuer, RetryEligibility, SessionCoordinator};
use crate::telemetry::{Logger, NoOpMetrics, SessionMetrics, TracingLogger};
use crate::types::ClientConfig;

/// Client for the time-tracking backend.
///
/// Every resource call goes through one shared [`SessionCoordinator`], so an
/// expired access credential is refreshed once no matter how many calls are
/// in flight.
pub struct TimeTrackClient<
    T: HttpTransport = ReqwestHttpTransport,
    I: CredentialIssuer = HttpCredentialIssuer<T>,
> {
    config: Arc<ClientConfig>,
    coordinator: Arc<SessionCoordinator<T, I>>,
    auth: AuthServiceImpl<T, I>,
    employees: EmployeeServiceImpl<T, I>,
    activities: ActivityServiceImpl<T, I>,
}

impl TimeTrackClient<ReqwestHttpTransport, HttpCredentialIssuer<ReqwestHttpTransport>> {
    /// Create a client talking to `config.base_url` over HTTP.
    ///
    /// The credential issuer shares the transport, and with it the cookie jar
    /// holding the session.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = Arc::new(create_transport(config.timeout, config.max_response_size)?);
        let issuer = Arc::new(HttpCredentialIssuer::new(config.clone(), transport.clone()));
        Ok(Self::with_telemetry(
            config,
            transport,
            issuer,
            Arc::new(TracingLogger::new()),
            Arc::new(NoOpMetrics),
        ))
    }
}

impl<T: HttpTransport, I: CredentialIssuer> TimeTrackClient<T, I> {
    /// Create a client with custom implementations.
    pub fn with_components(config: ClientConfig, transport: T, issuer: I) -> Self {
        Self::with_telemetry(
            config,
            Arc::new(transport),
            Arc::new(issuer),
            Arc::new(TracingLogger::new()),
            Arc::new(NoOpMetrics),
        )
    }

    /// Create a client with custom implementations and telemetry sinks.
    pub fn with_telemetry(
        config: ClientConfig,
        transport: Arc<T>,
        issuer: Arc<I>,
        logger: Arc<dyn Logger>,
        metrics: Arc<dyn SessionMetrics>,
    ) -> Self {
        let eligibility = RetryEligibility::from_config(&config);
        let coordinator = Arc::new(
            SessionCoordinator::new(transport, issuer, eligibility)
                .with_logger(logger.clone())
                .with_metrics(metrics),
        );
        let config = Arc::new(config);
        let context = ServiceContext::new(config.clone(), coordinator.clone());

        Self {
            config,
            auth: AuthServiceImpl::new(context.clone(), logger),
            employees: EmployeeServiceImpl::new(context.clone()),
            activities: ActivityServiceImpl::new(context),
            coordinator,
        }
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sign-in state and account operations.
    pub fn auth(&self) -> &AuthServiceImpl<T, I> {
        &self.auth
    }

    /// Employee profiles.
    pub fn employees(&self) -> &EmployeeServiceImpl<T, I> {
        &self.employees
    }

    /// Activities and server-side statistics.
    pub fn activities(&self) -> &ActivityServiceImpl<T, I> {
        &self.activities
    }

    /// The shared session coordinator.
    pub fn coordinator(&self) -> &Arc<SessionCoordinator<T, I>> {
        &self.coordinator
    }

    /// Send an arbitrary request through the session coordinator.
    pub async fn request(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        self.coordinator.dispatch(request).await
    }
}

/// Create a client with the default HTTP transport.
pub fn time_track_client(config: ClientConfig) -> ClientResult<TimeTrackClient> {
    TimeTrackClient::new(config)
}
