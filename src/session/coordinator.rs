//! Session Refresh Coordinator
//!
//! Sends requests on behalf of the resource services and recovers from an
//! expired access credential without the caller noticing:
//!
//! - the first request that sees a 401 starts a single refresh exchange;
//! - requests that see a 401 while that refresh is in flight are parked in a
//!   FIFO queue instead of starting their own;
//! - when the refresh settles the queue is released in arrival order, each
//!   parked request is sent once more (or rejected with the refresh failure),
//!   and the request that started the refresh is replayed.
//!
//! A request is replayed at most once. Requests to the credential endpoints
//! never take part.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::core::{HttpRequest, HttpResponse, HttpTransport};
use crate::error::{create_error_from_response, AuthenticationError, ClientError, ClientResult};
use crate::session::{CredentialIssuer, RetryEligibility};
use crate::telemetry::{LogContext, Logger, NoOpMetrics, SessionMetrics, TracingLogger};

/// Request captured by the coordinator together with its refresh markers.
#[derive(Clone, Debug)]
pub struct PendingRequest {
    pub request: HttpRequest,
    /// False for requests to exempt endpoints.
    pub retry_eligible: bool,
    /// Set once the request has been through a refresh cycle.
    pub retried: bool,
}

type RefreshOutcome = Result<(), AuthenticationError>;

struct Waiter {
    ticket: u64,
    sender: oneshot::Sender<RefreshOutcome>,
}

#[derive(Default)]
struct RefreshState {
    in_progress: bool,
    waiters: VecDeque<Waiter>,
    next_ticket: u64,
}

/// Marks a refresh as in flight. Settling (or dropping) it clears the flag
/// and releases every waiter, so a cancelled refresh cannot strand the queue.
struct RefreshFlight<'a> {
    state: &'a Mutex<RefreshState>,
    settled: bool,
}

impl<'a> RefreshFlight<'a> {
    fn new(state: &'a Mutex<RefreshState>) -> Self {
        Self {
            state,
            settled: false,
        }
    }

    /// Returns the number of waiters released.
    fn settle(mut self, outcome: RefreshOutcome) -> usize {
        self.settled = true;
        release_waiters(self.state, outcome)
    }
}

impl Drop for RefreshFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            release_waiters(self.state, Err(AuthenticationError::RefreshAborted));
        }
    }
}

fn release_waiters(state: &Mutex<RefreshState>, outcome: RefreshOutcome) -> usize {
    let waiters = {
        let mut state = state.lock();
        state.in_progress = false;
        std::mem::take(&mut state.waiters)
    };

    let released = waiters.len();
    for waiter in waiters {
        // A waiter whose caller went away has nothing left to replay.
        let _ = waiter.sender.send(outcome.clone());
    }
    released
}

/// Coordinates credential refreshes for every request sent through it.
pub struct SessionCoordinator<T: HttpTransport, I: CredentialIssuer> {
    transport: Arc<T>,
    issuer: Arc<I>,
    eligibility: RetryEligibility,
    state: Mutex<RefreshState>,
    logger: Arc<dyn Logger>,
    metrics: Arc<dyn SessionMetrics>,
}

impl<T: HttpTransport, I: CredentialIssuer> SessionCoordinator<T, I> {
    /// Create new coordinator. Logs through `tracing`, records no metrics.
    pub fn new(transport: Arc<T>, issuer: Arc<I>, eligibility: RetryEligibility) -> Self {
        Self {
            transport,
            issuer,
            eligibility,
            state: Mutex::new(RefreshState::default()),
            logger: Arc::new(TracingLogger::new()),
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Replace the logger.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Replace the metrics sink.
    pub fn with_metrics(mut self, metrics: Arc<dyn SessionMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Transport the coordinator sends through.
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Credential issuer used for refreshes.
    pub fn issuer(&self) -> &Arc<I> {
        &self.issuer
    }

    /// Whether a refresh exchange is currently in flight.
    pub fn refresh_in_progress(&self) -> bool {
        self.state.lock().in_progress
    }

    /// Number of requests parked behind the in-flight refresh.
    pub fn queued_requests(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Tag a request with its refresh markers.
    pub fn tag(&self, request: HttpRequest) -> PendingRequest {
        let retry_eligible = self.eligibility.is_eligible(&request.url);
        PendingRequest {
            request,
            retry_eligible,
            retried: false,
        }
    }

    /// Send a request, refreshing the session and replaying the request if
    /// the backend reports the access credential as expired.
    ///
    /// Only 2xx responses are returned as `Ok`.
    pub async fn dispatch(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let pending = self.tag(request);
        match self.send(&pending).await {
            Ok(response) => Ok(response),
            Err(error) => self.on_response_error(pending, error).await,
        }
    }

    /// Handle a failed request.
    ///
    /// Errors other than a first 401 on an eligible request are returned
    /// unchanged.
    pub async fn on_response_error(
        &self,
        mut pending: PendingRequest,
        error: ClientError,
    ) -> ClientResult<HttpResponse> {
        let context = Self::context(&pending.request);

        if !self.is_recoverable(&pending, &error) {
            self.logger.debug(
                "passing response error through",
                &context
                    .clone()
                    .extra("error", error.error_code())
                    .extra("retried", pending.retried)
                    .extra("retry_eligible", pending.retry_eligible),
            );
            return Err(error);
        }

        // Check and set happen under one lock, with no await in between.
        let parked = {
            let mut state = self.state.lock();
            if state.in_progress {
                let (sender, receiver) = oneshot::channel();
                let ticket = state.next_ticket;
                state.next_ticket += 1;
                state.waiters.push_back(Waiter { ticket, sender });
                Some((ticket, receiver))
            } else {
                state.in_progress = true;
                None
            }
        };

        pending.retried = true;

        if let Some((ticket, receiver)) = parked {
            self.metrics.record_request_queued();
            self.logger.debug(
                "refresh already in flight, queueing request",
                &context.clone().extra("ticket", ticket),
            );

            let outcome = receiver
                .await
                .unwrap_or(Err(AuthenticationError::RefreshAborted));
            if let Err(refresh_error) = outcome {
                self.logger.debug(
                    "queued request rejected",
                    &context.extra("ticket", ticket).extra("error", &refresh_error),
                );
                return Err(refresh_error.into());
            }

            self.metrics.record_request_replayed(true);
            self.logger
                .debug("replaying queued request", &context.extra("ticket", ticket));
            return self.send(&pending).await;
        }

        let flight = RefreshFlight::new(&self.state);
        self.metrics.record_refresh_started();
        self.logger
            .warn("access credential expired, refreshing session", &context);

        let outcome = self.issuer.refresh().await;
        let released = flight.settle(outcome.clone());
        self.metrics.record_refresh(outcome.is_ok(), released);

        match outcome {
            Ok(()) => {
                self.logger.info(
                    "session refreshed",
                    &context.clone().extra("released", released),
                );
                self.metrics.record_request_replayed(false);
                self.send(&pending).await
            }
            Err(refresh_error) => {
                self.logger.error(
                    "session refresh failed",
                    &context
                        .extra("released", released)
                        .extra("error", &refresh_error),
                );
                Err(refresh_error.into())
            }
        }
    }

    fn is_recoverable(&self, pending: &PendingRequest, error: &ClientError) -> bool {
        error.is_session_expired()
            && pending.retry_eligible
            && !pending.retried
            && !self.eligibility.is_exempt(&pending.request.url)
    }

    async fn send(&self, pending: &PendingRequest) -> ClientResult<HttpResponse> {
        let request = &pending.request;
        let response = self.transport.send(request.clone()).await?;

        self.metrics
            .record_request(request.method.as_str(), response.status);
        self.logger.trace(
            "response received",
            &Self::context(request).status(response.status),
        );

        if response.is_success() {
            Ok(response)
        } else {
            Err(create_error_from_response(
                response.status,
                &request.url,
                &response.body,
            ))
        }
    }

    fn context(request: &HttpRequest) -> LogContext {
        LogContext::new()
            .operation("dispatch")
            .method(request.method.as_str())
            .url(request.url.clone())
    }
}
