//! Session refresh against a cookie-issuing backend.

use super::*;
use futures::future::join_all;
use std::time::Duration;
use timetrack_client::services::{ActivityService, EmployeeService};
use timetrack_client::{get_user_message, AuthenticationError, ClientError};
use tokio_test::{assert_err, assert_ok};

/// Resource endpoint that only accepts the refreshed access cookie.
async fn mount_guarded(server: &MockServer, http_method: &str, suffix: &str, body: serde_json::Value) {
    Mock::given(method(http_method))
        .and(path(api_path(suffix)))
        .and(HasCookie("accessToken=fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method(http_method))
        .and(path(api_path(suffix)))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "statusCode": 401,
            "message": "Unauthorized"
        })))
        .mount(server)
        .await;
}

async fn mount_refresh(server: &MockServer, delay: Duration, expected_calls: u64) {
    let response = with_cookie(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
        "accessToken",
        "fresh",
    );
    let response = with_cookie(response, "refreshToken", "r2").set_delay(delay);

    Mock::given(method("POST"))
        .and(path(api_path("auth/refresh")))
        .and(HasCookie("refreshToken=r1"))
        .respond_with(response)
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_expired_access_cookie_is_refreshed_transparently() {
    let server = setup_mock_server().await;
    mount_guarded(&server, "GET", "activity/all", serde_json::json!([])).await;
    mount_refresh(&server, Duration::ZERO, 1).await;
    let client = signed_in_client(&server).await;

    let activities = assert_ok!(client.activities().all().await);

    assert!(activities.is_empty());
    assert!(!client.coordinator().refresh_in_progress());
}

#[tokio::test]
async fn test_concurrent_expiries_trigger_one_refresh() {
    let server = setup_mock_server().await;
    mount_guarded(&server, "GET", "activity/all", serde_json::json!([])).await;
    mount_guarded(&server, "GET", "admin/employees", serde_json::json!([])).await;
    // Held long enough for every 401 to arrive while the refresh is in flight.
    mount_refresh(&server, Duration::from_millis(300), 1).await;
    let client = signed_in_client(&server).await;

    let activity_calls = join_all((0..4).map(|_| client.activities().all()));
    let employee_calls = join_all((0..4).map(|_| client.employees().list()));
    let (activities, employees) = tokio::join!(activity_calls, employee_calls);

    assert!(activities.iter().all(|r| r.is_ok()));
    assert!(employees.iter().all(|r| r.is_ok()));
    assert_eq!(client.coordinator().queued_requests(), 0);
}

#[tokio::test]
async fn test_rejected_refresh_fails_the_request() {
    let server = setup_mock_server().await;
    mount_guarded(&server, "GET", "activity/all", serde_json::json!([])).await;
    Mock::given(method("POST"))
        .and(path(api_path("auth/refresh")))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "statusCode": 401,
            "message": "Unauthorized"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = signed_in_client(&server).await;

    let error = assert_err!(client.activities().all().await);

    match &error {
        ClientError::Authentication(AuthenticationError::RefreshFailed { status, message }) => {
            assert_eq!(*status, Some(401));
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(error.needs_reauth());
    assert_eq!(
        get_user_message(&error),
        "Your session has expired. Please sign in again."
    );
    assert!(!client.coordinator().refresh_in_progress());
}

#[tokio::test]
async fn test_persistent_401_is_not_retried_twice() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path(api_path("activity/all")))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, Duration::ZERO, 1).await;
    let client = signed_in_client(&server).await;

    let error = assert_err!(client.activities().all().await);

    assert!(error.is_session_expired());
}

#[tokio::test]
async fn test_login_failure_does_not_refresh() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path(api_path("auth/login")))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "statusCode": 401,
            "message": "Invalid password"
        })))
        .mount(&server)
        .await;
    mount_refresh(&server, Duration::ZERO, 0).await;
    let client = client_for(&server);

    let error = assert_err!(
        client
            .auth()
            .login(LoginRequest::new("jdoe", "wrong-password"))
            .await
    );

    assert!(matches!(
        error,
        ClientError::Authentication(AuthenticationError::InvalidCredentials { .. })
    ));
    assert!(!client.auth().is_authenticated());
}
