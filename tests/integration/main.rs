//! Integration tests using WireMock
//!
//! These tests drive the real reqwest transport, cookie jar included, against
//! a mock backend that issues and checks `accessToken`/`refreshToken` cookies.

mod services;
mod session_refresh;

use timetrack_client::{client_config, time_track_client, LoginRequest, TimeTrackClient};
use timetrack_client::services::AuthService;
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

pub const API: &str = "/api/v1";

/// Matches requests whose `Cookie` header carries `pair` (e.g. `accessToken=fresh`).
pub struct HasCookie(pub &'static str);

impl Match for HasCookie {
    fn matches(&self, request: &Request) -> bool {
        request
            .headers
            .get_all("cookie")
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .any(|pair| pair.trim() == self.0)
    }
}

pub fn api_path(suffix: &str) -> String {
    format!("{}/{}", API, suffix)
}

/// Response setting a session cookie the way the backend does.
pub fn with_cookie(template: ResponseTemplate, name: &str, value: &str) -> ResponseTemplate {
    template.append_header(
        "set-cookie",
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", name, value).as_str(),
    )
}

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Mount a login endpoint that hands out a stale access cookie.
pub async fn mount_login(server: &MockServer) {
    let response = ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "id": 1,
        "username": "jdoe",
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z"
    }));
    let response = with_cookie(response, "accessToken", "stale");
    let response = with_cookie(response, "refreshToken", "r1");

    Mock::given(method("POST"))
        .and(path(api_path("auth/login")))
        .respond_with(response)
        .mount(server)
        .await;
}

pub fn client_for(server: &MockServer) -> TimeTrackClient {
    let config = client_config()
        .base_url(format!("{}{}", server.uri(), API))
        .build()
        .expect("valid config");
    time_track_client(config).expect("client")
}

/// Client signed in against `server`.
pub async fn signed_in_client(server: &MockServer) -> TimeTrackClient {
    mount_login(server).await;
    let client = client_for(server);
    client
        .auth()
        .login(LoginRequest::new("jdoe", "Sup3r-secret!"))
        .await
        .expect("login");
    client
}
