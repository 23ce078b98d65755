//! Authentication service: sign-in state on top of the credential issuer.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::core::{Endpoints, HttpMethod, HttpTransport};
use crate::error::{AuthenticationError, ClientError, ClientResult};
use crate::services::ServiceContext;
use crate::session::CredentialIssuer;
use crate::telemetry::{LogContext, Logger};
use crate::types::{LoginRequest, RegisterRequest, User};
use crate::validation::{validate_login, validate_registration};

/// Authentication service interface.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Sign in. The returned user is kept as the current user.
    async fn login(&self, request: LoginRequest) -> ClientResult<User>;

    /// Create an account. Does not sign in.
    async fn register(&self, request: RegisterRequest) -> ClientResult<User>;

    /// Sign out and forget the current user.
    async fn logout(&self) -> ClientResult<()>;

    /// Refresh the session outside of any request.
    async fn refresh(&self) -> ClientResult<()>;

    /// Ask the backend whether the held access credential is still accepted.
    async fn validate_access_token(&self) -> ClientResult<bool>;

    /// User of the last successful login.
    fn current_user(&self) -> Option<User>;

    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}

/// Authentication service implementation.
pub struct AuthServiceImpl<T: HttpTransport, I: CredentialIssuer> {
    context: ServiceContext<T, I>,
    issuer: Arc<I>,
    current_user: Mutex<Option<User>>,
    logger: Arc<dyn Logger>,
}

impl<T: HttpTransport, I: CredentialIssuer> AuthServiceImpl<T, I> {
    pub fn new(context: ServiceContext<T, I>, logger: Arc<dyn Logger>) -> Self {
        let issuer = context.coordinator().issuer().clone();
        Self {
            context,
            issuer,
            current_user: Mutex::new(None),
            logger,
        }
    }
}

#[async_trait]
impl<T: HttpTransport, I: CredentialIssuer> AuthService for AuthServiceImpl<T, I> {
    async fn login(&self, request: LoginRequest) -> ClientResult<User> {
        validate_login(&request)?;

        let user = self.issuer.login(&request).await?;
        self.logger.info(
            "signed in",
            &LogContext::new()
                .operation("login")
                .extra("user_id", user.id),
        );
        *self.current_user.lock() = Some(user.clone());
        Ok(user)
    }

    async fn register(&self, request: RegisterRequest) -> ClientResult<User> {
        validate_registration(&request)?;
        self.context
            .submit(HttpMethod::Post, Endpoints::REGISTER, &request)
            .await
    }

    async fn logout(&self) -> ClientResult<()> {
        let result = self.issuer.logout().await;
        // Local state is dropped even when the backend call fails.
        let user = self.current_user.lock().take();
        self.logger.info(
            "signed out",
            &LogContext::new()
                .operation("logout")
                .extra("had_user", user.is_some()),
        );
        result
    }

    async fn refresh(&self) -> ClientResult<()> {
        self.issuer.refresh().await.map_err(ClientError::from)
    }

    async fn validate_access_token(&self) -> ClientResult<bool> {
        match self
            .context
            .send(HttpMethod::Post, Endpoints::VALIDATE_ACCESS_TOKEN)
            .await
        {
            Ok(_) => Ok(true),
            Err(ClientError::Authentication(AuthenticationError::SessionExpired { .. })) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn current_user(&self) -> Option<User> {
        self.current_user.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HttpResponse, MockHttpTransport};
    use crate::session::{MockCredentialIssuer, RetryEligibility, SessionCoordinator};
    use crate::telemetry::InMemoryLogger;
    use crate::types::ClientConfig;

    fn service(
        transport: Arc<MockHttpTransport>,
        issuer: Arc<MockCredentialIssuer>,
    ) -> AuthServiceImpl<MockHttpTransport, MockCredentialIssuer> {
        let config = Arc::new(ClientConfig::default());
        let coordinator = Arc::new(SessionCoordinator::new(
            transport,
            issuer,
            RetryEligibility::from_config(&config),
        ));
        AuthServiceImpl::new(
            ServiceContext::new(config, coordinator),
            Arc::new(InMemoryLogger::new()),
        )
    }

    #[tokio::test]
    async fn test_login_sets_current_user() {
        let issuer = Arc::new(MockCredentialIssuer::new());
        let auth = service(Arc::new(MockHttpTransport::new()), issuer.clone());
        assert!(!auth.is_authenticated());

        let user = auth.login(LoginRequest::new("jdoe", "secret")).await.unwrap();

        assert_eq!(user.username, "jdoe");
        assert_eq!(auth.current_user(), Some(user));
        assert_eq!(issuer.get_login_history(), vec!["jdoe"]);
    }

    #[tokio::test]
    async fn test_login_rejects_invalid_form_locally() {
        let issuer = Arc::new(MockCredentialIssuer::new());
        let auth = service(Arc::new(MockHttpTransport::new()), issuer.clone());

        let result = auth.login(LoginRequest::new("jd", "secret")).await;

        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert!(issuer.get_login_history().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_current_user() {
        let issuer = Arc::new(MockCredentialIssuer::new());
        let auth = service(Arc::new(MockHttpTransport::new()), issuer.clone());
        auth.login(LoginRequest::new("jdoe", "secret")).await.unwrap();

        auth.logout().await.unwrap();

        assert!(auth.current_user().is_none());
        assert_eq!(issuer.logout_count(), 1);
    }

    #[tokio::test]
    async fn test_register_validates_before_sending() {
        let transport = Arc::new(MockHttpTransport::new());
        let auth = service(transport.clone(), Arc::new(MockCredentialIssuer::new()));

        let result = auth.register(RegisterRequest::new("jdoe", "weak")).await;

        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert!(transport.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_register_posts_account() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(201, &serde_json::json!({"id": 9, "username": "new_user"}));
        let auth = service(transport.clone(), Arc::new(MockCredentialIssuer::new()));

        let user = auth
            .register(RegisterRequest::new("new_user", "Sup3r-secret!"))
            .await
            .unwrap();

        assert_eq!(user.id, 9);
        assert!(!auth.is_authenticated());
        assert_eq!(
            transport.get_last_request().unwrap().url,
            "http://localhost:4000/api/v1/auth/register"
        );
    }

    #[tokio::test]
    async fn test_validate_access_token() {
        let transport = Arc::new(MockHttpTransport::new());
        let issuer = Arc::new(MockCredentialIssuer::new());
        transport.queue_response(HttpResponse::new(200));
        transport.queue_response(HttpResponse::new(401));
        let auth = service(transport, issuer.clone());

        assert!(auth.validate_access_token().await.unwrap());
        assert!(!auth.validate_access_token().await.unwrap());
        assert_eq!(issuer.refresh_count(), 0);
    }
}
