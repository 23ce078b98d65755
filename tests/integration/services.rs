//! Resource services over real HTTP.

use super::*;
use chrono::NaiveDate;
use serde_json::json;
use timetrack_client::services::{ActivityService, EmployeeService};
use timetrack_client::stats::{format_duration, DailySummary};
use timetrack_client::{
    ActivityType, ApiError, ClientError, EmployeeInput, Gender, RegisterRequest, StartActivity,
};
use wiremock::matchers::{body_json, query_param};

#[tokio::test]
async fn test_employee_crud() {
    let server = setup_mock_server().await;
    let client = signed_in_client(&server).await;

    Mock::given(method("POST"))
        .and(path(api_path("admin/employee")))
        .and(body_json(json!({"firstName": "Ada", "lastName": "Lovelace", "gender": "FEMALE"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 3,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "gender": "FEMALE",
            "userId": 1
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api_path("admin/employee/3")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let employee = client
        .employees()
        .create(EmployeeInput::new("Ada", "Lovelace", Gender::Female))
        .await
        .unwrap();
    assert_eq!(employee.id, 3);
    assert_eq!(employee.user_id, Some(1));

    client.employees().delete(employee.id).await.unwrap();
}

#[tokio::test]
async fn test_conflict_maps_to_api_error() {
    let server = setup_mock_server().await;
    let client = signed_in_client(&server).await;

    Mock::given(method("POST"))
        .and(path(api_path("activity/start")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "statusCode": 409,
            "message": "Employee already has a running activity",
            "error": "Conflict"
        })))
        .mount(&server)
        .await;

    let result = client
        .activities()
        .start(StartActivity::new(ActivityType::Break, 3))
        .await;

    match result {
        Err(ClientError::Api(ApiError::Conflict { message })) => {
            assert_eq!(message, "Employee already has a running activity")
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_employee_activities_feed_local_summary() {
    let server = setup_mock_server().await;
    let client = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path(api_path("activity/3")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "type": "WORK", "startTime": "2025-03-14T08:00:00Z",
             "endTime": "2025-03-14T11:30:00Z", "employeeId": 3},
            {"id": 2, "type": "WC", "startTime": "2025-03-14T11:30:00Z",
             "endTime": "2025-03-14T11:35:00Z", "employeeId": 3}
        ])))
        .mount(&server)
        .await;

    let activities = client.activities().for_employee(3).await.unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    let summary = DailySummary::for_date(&activities, date, &chrono::Utc, chrono::Utc::now());

    assert_eq!(format_duration(summary.total(ActivityType::Work)), "03:30:00");
    assert_eq!(format_duration(summary.total(ActivityType::Wc)), "00:05:00");
}

#[tokio::test]
async fn test_weekly_overview_sends_start_date() {
    let server = setup_mock_server().await;
    let client = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path(api_path("activity/statistics/weekly")))
        .and(query_param("startDate", "2025-03-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"days": []})))
        .expect(1)
        .mount(&server)
        .await;

    let overview = client
        .activities()
        .weekly_overview(NaiveDate::from_ymd_opt(2025, 3, 10))
        .await
        .unwrap();

    assert_eq!(overview, json!({"days": []}));
}

#[tokio::test]
async fn test_export_downloads_bytes() {
    let server = setup_mock_server().await;
    let client = signed_in_client(&server).await;
    let spreadsheet = vec![0x50, 0x4b, 0x03, 0x04, 0x14, 0x00];

    Mock::given(method("GET"))
        .and(path(api_path("activity/statistics/3/export")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "content-type",
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                )
                .set_body_bytes(spreadsheet.clone()),
        )
        .mount(&server)
        .await;

    let bytes = client.activities().export(3).await.unwrap();

    assert_eq!(bytes, spreadsheet);
}

#[tokio::test]
async fn test_register_and_token_validation() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path(api_path("auth/register")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 8, "username": "new_user"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("auth/validate-access-token")))
        .and(HasCookie("accessToken=stale"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("auth/validate-access-token")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user = client
        .auth()
        .register(RegisterRequest::new("new_user", "Sup3r-secret!"))
        .await
        .unwrap();
    assert_eq!(user.username, "new_user");
    assert!(!client.auth().validate_access_token().await.unwrap());

    mount_login(&server).await;
    client
        .auth()
        .login(LoginRequest::new("jdoe", "Sup3r-secret!"))
        .await
        .unwrap();
    assert!(client.auth().validate_access_token().await.unwrap());
}
