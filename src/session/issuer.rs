//! Credential Issuer
//!
//! Boundary to the backend's credential endpoints. The backend answers login
//! and refresh with HTTP-only `accessToken`/`refreshToken` cookies; the
//! transport's cookie jar carries them, so nothing here reads token values.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{
    create_error_from_response, parse_error_body, AuthenticationError, ClientError, ClientResult,
};
use crate::types::{ClientConfig, LoginRequest, User};

/// Credential issuer interface.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    /// Exchange username and password for a fresh credential pair.
    async fn login(&self, request: &LoginRequest) -> ClientResult<User>;

    /// Exchange the held refresh credential for a fresh pair.
    async fn refresh(&self) -> Result<(), AuthenticationError>;

    /// Drop the held credentials.
    async fn logout(&self) -> ClientResult<()>;
}

/// Issuer talking to the backend's `auth/*` endpoints.
///
/// Requests go straight to the transport, never through the session
/// coordinator.
pub struct HttpCredentialIssuer<T: HttpTransport> {
    config: ClientConfig,
    transport: Arc<T>,
}

impl<T: HttpTransport> HttpCredentialIssuer<T> {
    /// Create new issuer sharing `transport` (and its cookie jar).
    pub fn new(config: ClientConfig, transport: Arc<T>) -> Self {
        Self { config, transport }
    }

    fn message_of(body: &[u8], status: u16) -> String {
        parse_error_body(body)
            .and_then(|b| b.message_text())
            .unwrap_or_else(|| format!("HTTP {}", status))
    }
}

#[async_trait]
impl<T: HttpTransport> CredentialIssuer for HttpCredentialIssuer<T> {
    async fn login(&self, request: &LoginRequest) -> ClientResult<User> {
        let url = self.config.endpoint(&self.config.session.login)?;
        let http_request = HttpRequest::new(HttpMethod::Post, url.clone())
            .json(request)?
            .timeout(self.config.timeout);

        let response = self.transport.send(http_request).await?;

        match response.status {
            200..=299 => response.json(),
            // The backend answers unknown users with 404 and bad passwords with 401.
            401 | 404 => Err(ClientError::Authentication(
                AuthenticationError::InvalidCredentials {
                    message: Self::message_of(&response.body, response.status),
                },
            )),
            status => Err(create_error_from_response(status, &url, &response.body)),
        }
    }

    async fn refresh(&self) -> Result<(), AuthenticationError> {
        let url = self
            .config
            .endpoint(&self.config.session.refresh)
            .map_err(|e| AuthenticationError::from_refresh_error(&e))?;
        let http_request = HttpRequest::new(HttpMethod::Post, url).timeout(self.config.timeout);

        let response = self
            .transport
            .send(http_request)
            .await
            .map_err(|e| AuthenticationError::from_refresh_error(&e))?;

        if response.is_success() {
            Ok(())
        } else {
            Err(AuthenticationError::RefreshFailed {
                status: Some(response.status),
                message: Self::message_of(&response.body, response.status),
            })
        }
    }

    async fn logout(&self) -> ClientResult<()> {
        let url = self.config.endpoint(&self.config.session.logout)?;
        let http_request = HttpRequest::new(HttpMethod::Post, url.clone()).timeout(self.config.timeout);

        let response = self.transport.send(http_request).await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(create_error_from_response(response.status, &url, &response.body))
        }
    }
}

type RefreshHook = Box<dyn Fn() + Send + Sync>;

/// Mock credential issuer for testing.
///
/// Refreshes succeed unless an error was queued. With [`hold_refreshes`]
/// each refresh parks until [`release_refresh`] is called, which lets tests
/// pile requests up behind an in-flight refresh.
///
/// [`hold_refreshes`]: MockCredentialIssuer::hold_refreshes
/// [`release_refresh`]: MockCredentialIssuer::release_refresh
#[derive(Default)]
pub struct MockCredentialIssuer {
    refresh_count: AtomicUsize,
    login_history: std::sync::Mutex<Vec<String>>,
    refresh_errors: std::sync::Mutex<Vec<AuthenticationError>>,
    next_user: std::sync::Mutex<Option<User>>,
    gate: std::sync::Mutex<Option<Arc<Notify>>>,
    on_refresh: std::sync::Mutex<Option<RefreshHook>>,
    logout_count: AtomicUsize,
}

impl MockCredentialIssuer {
    /// Create new mock issuer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next refresh with `error`.
    pub fn fail_next_refresh(&self, error: AuthenticationError) -> &Self {
        self.refresh_errors.lock().unwrap().push(error);
        self
    }

    /// User returned by the next login.
    pub fn set_next_user(&self, user: User) -> &Self {
        *self.next_user.lock().unwrap() = Some(user);
        self
    }

    /// Make refreshes wait for [`release_refresh`](Self::release_refresh).
    pub fn hold_refreshes(&self) -> &Self {
        *self.gate.lock().unwrap() = Some(Arc::new(Notify::new()));
        self
    }

    /// Let one held refresh continue.
    pub fn release_refresh(&self) {
        if let Some(gate) = self.gate.lock().unwrap().as_ref() {
            gate.notify_one();
        }
    }

    /// Run `hook` whenever a refresh succeeds.
    pub fn on_refresh<F: Fn() + Send + Sync + 'static>(&self, hook: F) -> &Self {
        *self.on_refresh.lock().unwrap() = Some(Box::new(hook));
        self
    }

    /// Number of refresh exchanges started.
    pub fn refresh_count(&self) -> usize {
        self.refresh_count.load(Ordering::SeqCst)
    }

    /// Number of logouts.
    pub fn logout_count(&self) -> usize {
        self.logout_count.load(Ordering::SeqCst)
    }

    /// Usernames passed to login.
    pub fn get_login_history(&self) -> Vec<String> {
        self.login_history.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialIssuer for MockCredentialIssuer {
    async fn login(&self, request: &LoginRequest) -> ClientResult<User> {
        self.login_history
            .lock()
            .unwrap()
            .push(request.username.clone());

        Ok(self.next_user.lock().unwrap().take().unwrap_or(User {
            id: 1,
            username: request.username.clone(),
            created_at: None,
            updated_at: None,
        }))
    }

    async fn refresh(&self) -> Result<(), AuthenticationError> {
        self.refresh_count.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let queued_error = {
            let mut errors = self.refresh_errors.lock().unwrap();
            if errors.is_empty() {
                None
            } else {
                Some(errors.remove(0))
            }
        };
        if let Some(error) = queued_error {
            return Err(error);
        }

        if let Some(hook) = self.on_refresh.lock().unwrap().as_ref() {
            hook();
        }
        Ok(())
    }

    async fn logout(&self) -> ClientResult<()> {
        self.logout_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Create mock credential issuer for testing.
pub fn create_mock_issuer() -> MockCredentialIssuer {
    MockCredentialIssuer::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HttpResponse, MockHttpTransport};

    fn issuer(transport: Arc<MockHttpTransport>) -> HttpCredentialIssuer<MockHttpTransport> {
        HttpCredentialIssuer::new(ClientConfig::default(), transport)
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(
            200,
            &serde_json::json!({"id": 4, "username": "jdoe", "createdAt": "2025-01-01T00:00:00Z"}),
        );

        let user = issuer(transport.clone())
            .login(&LoginRequest::new("jdoe", "Sup3r-secret!"))
            .await
            .unwrap();
        assert_eq!(user.id, 4);

        let request = transport.get_last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "http://localhost:4000/api/v1/auth/login");
        assert!(request.body.unwrap().contains("\"password\":\"Sup3r-secret!\""));
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_invalid_credentials() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(
            404,
            &serde_json::json!({"statusCode": 404, "message": "User not found!", "error": "Not Found"}),
        );

        let result = issuer(transport)
            .login(&LoginRequest::new("ghost", "whatever"))
            .await;

        match result {
            Err(ClientError::Authentication(AuthenticationError::InvalidCredentials { message })) => {
                assert_eq!(message, "User not found!")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refresh_rejection_carries_status() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(HttpResponse::new(401));

        let error = issuer(transport.clone()).refresh().await.unwrap_err();
        assert_eq!(
            error,
            AuthenticationError::RefreshFailed {
                status: Some(401),
                message: "HTTP 401".to_string()
            }
        );
        assert_eq!(
            transport.get_last_request().unwrap().url,
            "http://localhost:4000/api/v1/auth/refresh"
        );
    }

    #[tokio::test]
    async fn test_refresh_network_failure_is_refresh_failed() {
        let transport = Arc::new(MockHttpTransport::new());

        let error = issuer(transport).refresh().await.unwrap_err();
        assert!(matches!(
            error,
            AuthenticationError::RefreshFailed { status: None, .. }
        ));
    }

    #[tokio::test]
    async fn test_mock_issuer_counts_and_fails() {
        let issuer = MockCredentialIssuer::new();
        issuer.fail_next_refresh(AuthenticationError::RefreshFailed {
            status: Some(401),
            message: "expired".to_string(),
        });

        assert!(issuer.refresh().await.is_err());
        assert!(issuer.refresh().await.is_ok());
        assert_eq!(issuer.refresh_count(), 2);
    }
}
