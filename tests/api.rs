use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use call_analytics_server::config::DataSource;
use call_analytics_server::routes;
use call_analytics_server::services::session_service::SessionService;
use call_analytics_server::services::storage::RecordingLinks;
use call_analytics_server::state::AppState;
use call_analytics_server::store::demo::{self, ORG_KYIV, ORG_LVIV};
use call_analytics_server::store::memory::{Dataset, MemoryStore};

fn app_with(data: Dataset) -> Router {
    let state = AppState::new(
        Arc::new(MemoryStore::new(data)),
        SessionService::new(Some("test-secret"), 3600, "admin@example.com", "admin").unwrap(),
        RecordingLinks::new(Some("https://demo.supabase.co"), "recordings").unwrap(),
        DataSource::Memory,
    );
    routes::router(state)
}

fn app() -> Router {
    app_with(demo::dataset())
}

struct TestResponse {
    status: StatusCode,
    headers: header::HeaderMap,
    body: Value,
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        headers,
        body,
    }
}

async fn get(app: &Router, uri: &str) -> TestResponse {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn login(app: &Router) -> String {
    let response = send(
        app,
        json_request(
            Method::POST,
            "/api/auth/login",
            None,
            json!({ "email": "admin@example.com", "password": "admin" }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    response.body["accessToken"].as_str().unwrap().to_string()
}

fn error_code(response: &TestResponse) -> &str {
    response.body["error"]["code"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn list_calls_returns_json_array() {
    let response = get(&app(), "/api/calls").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_array());
    assert_eq!(response.body.as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn list_calls_uses_camel_case_and_newest_first() {
    let response = get(&app(), "/api/calls").await;
    let first = &response.body[0];

    assert_eq!(first["id"], demo::call_id(12).to_string());
    assert_eq!(first["managerName"], "Iryna Melnyk");
    assert!(first.get("durationSeconds").is_some());
    assert!(first.get("duration_seconds").is_none());
}

#[tokio::test]
async fn list_calls_paginates_with_total_header() {
    let app = app();
    let response = get(&app, "/api/calls?page=3&perPage=5").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 2);
    assert_eq!(response.headers["x-total-count"], "12");
}

#[tokio::test]
async fn list_calls_filters() {
    let app = app();

    let response = get(&app, &format!("/api/calls?organizationId={}", ORG_LVIV)).await;
    assert_eq!(response.body.as_array().unwrap().len(), 3);

    let response = get(&app, "/api/calls?status=missed").await;
    let calls = response.body.as_array().unwrap();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c["status"] == "missed"));

    let response = get(&app, "/api/calls?manager=olena%20kovalenko&direction=incoming").await;
    assert_eq!(response.body.as_array().unwrap().len(), 2);

    let response = get(&app, "/api/calls?sentiment=negative").await;
    assert_eq!(response.body.as_array().unwrap().len(), 2);

    let response = get(&app, "/api/calls?minDuration=300").await;
    assert_eq!(response.body.as_array().unwrap().len(), 3);

    let response = get(
        &app,
        "/api/calls?from=2025-03-04T00:00:00Z&to=2025-03-05T00:00:00Z",
    )
    .await;
    assert_eq!(response.body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn list_calls_rejects_invalid_parameters() {
    let app = app();

    let response = get(&app, "/api/calls?perPage=500").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "invalid_request");

    let response = get(
        &app,
        "/api/calls?from=2025-03-05T00:00:00Z&to=2025-03-04T00:00:00Z",
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "invalid_request");

    // Rejected while deserializing the query string
    for uri in ["/api/calls?status=unknown", "/api/calls?page=abc"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(error_code(&response), "invalid_request", "{uri}");
        assert!(response.body["error"]["message"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn search_matches_phone_numbers() {
    let response = get(&app(), "/api/calls/search?q=0501112233").await;

    assert_eq!(response.status, StatusCode::OK);
    let calls = response.body.as_array().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(response.headers["x-total-count"], "2");
}

#[tokio::test]
async fn search_requires_query() {
    let app = app();

    let response = get(&app, "/api/calls/search").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "invalid_request");

    let response = get(&app, "/api/calls/search?q=%20%20").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stats_aggregate_demo_data() {
    let response = get(&app(), "/api/calls/stats").await;
    let stats = &response.body;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(stats["totalCalls"], 12);
    assert_eq!(stats["answeredCalls"], 8);
    assert_eq!(stats["missedCalls"], 3);
    assert_eq!(stats["failedCalls"], 1);
    assert_eq!(stats["sentiment"], json!({ "positive": 2, "neutral": 2, "negative": 2 }));

    let managers: Vec<Value> = stats["managers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["manager"].clone())
        .collect();
    assert_eq!(
        managers,
        vec![
            json!("Andriy Bondar"),
            json!("Olena Kovalenko"),
            json!("Iryna Melnyk"),
            json!("Taras Shevchuk"),
            Value::Null,
        ]
    );
    assert_eq!(stats["daily"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn stats_respect_filters() {
    let response = get(&app(), &format!("/api/calls/stats?organizationId={}", ORG_LVIV)).await;

    assert_eq!(response.body["totalCalls"], 3);
    assert_eq!(response.body["managers"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_dataset_yields_empty_results() {
    let app = app_with(Dataset::default());

    let response = get(&app, "/api/calls").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));

    let response = get(&app, "/api/calls/stats").await;
    assert_eq!(response.body["totalCalls"], 0);
    assert_eq!(response.body["answerRate"], 0.0);
    assert_eq!(response.body["averageSentimentScore"], Value::Null);
}

#[tokio::test]
async fn call_detail_embeds_transcript_and_analysis() {
    let response = get(&app(), &format!("/api/calls/{}", demo::call_id(1))).await;
    let call = &response.body;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        call["recordingUrl"],
        "https://demo.supabase.co/storage/v1/object/public/recordings/2025/03/03/48123301.mp3"
    );
    assert_eq!(call["transcript"]["callId"], demo::call_id(1).to_string());
    assert_eq!(call["transcript"]["segments"].as_array().unwrap().len(), 3);
    assert_eq!(call["analysis"]["sentiment"], "positive");
}

#[tokio::test]
async fn call_detail_without_analysis_has_nulls() {
    let response = get(&app(), &format!("/api/calls/{}", demo::call_id(2))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["transcript"], Value::Null);
    assert_eq!(response.body["analysis"], Value::Null);
    assert_eq!(response.body["recordingUrl"], Value::Null);
}

#[tokio::test]
async fn unknown_call_is_404() {
    let response = get(&app(), &format!("/api/calls/{}", uuid::Uuid::new_v4())).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&response), "call_not_found");
    assert_eq!(response.body["error"]["message"], "Call not found");
}

#[tokio::test]
async fn malformed_call_id_is_400() {
    let app = app();

    for uri in [
        "/api/calls/not-a-uuid",
        "/api/calls/not-a-uuid/transcript",
        "/api/organizations/not-a-uuid",
        "/api/binotel-accounts?organizationId=nope",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(error_code(&response), "invalid_request", "{uri}");
    }
}

#[tokio::test]
async fn transcript_and_analysis_endpoints() {
    let app = app();

    let response = get(&app, &format!("/api/calls/{}/transcript", demo::call_id(4))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["language"], "uk");

    let response = get(&app, &format!("/api/calls/{}/analysis", demo::call_id(4))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["sentiment"], "negative");
    assert_eq!(response.body["qualityScore"], 52.0);

    let response = get(&app, &format!("/api/calls/{}/transcript", demo::call_id(2))).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&response), "transcript_not_found");

    let response = get(&app, &format!("/api/calls/{}/analysis", demo::call_id(2))).await;
    assert_eq!(error_code(&response), "analysis_not_found");

    let response = get(&app, &format!("/api/calls/{}/analysis", uuid::Uuid::new_v4())).await;
    assert_eq!(error_code(&response), "call_not_found");
}

#[tokio::test]
async fn login_issues_usable_session() {
    let app = app();
    let token = login(&app).await;

    let response = send(
        &app,
        Request::builder()
            .uri("/api/auth/session")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], "admin@example.com");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = app();

    let response = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/login",
            None,
            json!({ "email": "admin@example.com", "password": "wrong" }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&response), "unauthorized");

    let response = send(
        &app,
        json_request(Method::POST, "/api/auth/login", None, json!({ "email": "" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_body_is_400() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{bad"))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "invalid_request");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .body(Body::from(r#"{"email":"admin@example.com","password":"admin"}"#))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "invalid_request");

    let token = login(&app).await;
    let response = send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/api/calls/{}", demo::call_id(1)),
            Some(&token),
            json!({ "tags": "not-a-list" }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "invalid_request");
}

#[tokio::test]
async fn session_endpoint_requires_token() {
    let response = get(&app(), "/api/auth/session").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn annotate_requires_session() {
    let app = app();
    let uri = format!("/api/calls/{}", demo::call_id(1));

    let response = send(
        &app,
        json_request(Method::PATCH, &uri, None, json!({ "notes": "hi" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        json_request(Method::PATCH, &uri, Some("forged.token.value"), json!({ "notes": "hi" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn annotate_updates_call() {
    let app = app();
    let token = login(&app).await;
    let uri = format!("/api/calls/{}", demo::call_id(1));

    let response = send(
        &app,
        json_request(
            Method::PATCH,
            &uri,
            Some(&token),
            json!({ "notes": "  Call back Monday ", "tags": ["callback", "callback", " vip "] }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["notes"], "Call back Monday");
    assert_eq!(response.body["tags"], json!(["callback", "vip"]));

    // Persisted and searchable
    let response = get(&app, "/api/calls/search?q=monday").await;
    assert_eq!(response.body.as_array().unwrap().len(), 1);

    // Clearing notes keeps tags
    let response = send(
        &app,
        json_request(Method::PATCH, &uri, Some(&token), json!({ "notes": null })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["notes"], Value::Null);
    assert_eq!(response.body["tags"], json!(["callback", "vip"]));
}

#[tokio::test]
async fn annotate_validates_body_and_target() {
    let app = app();
    let token = login(&app).await;

    let response = send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/api/calls/{}", demo::call_id(1)),
            Some(&token),
            json!({}),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/api/calls/{}", uuid::Uuid::new_v4()),
            Some(&token),
            json!({ "tags": [] }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&response), "call_not_found");
}

#[tokio::test]
async fn organizations_and_accounts() {
    let app = app();

    let response = get(&app, "/api/organizations").await;
    let names: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Kyiv Contact Center", "Lviv Support"]);

    let response = get(&app, &format!("/api/organizations/{}", ORG_KYIV)).await;
    assert_eq!(response.body["slug"], "kyiv");

    let response = get(&app, &format!("/api/organizations/{}/binotel-accounts", ORG_KYIV)).await;
    let accounts = response.body.as_array().unwrap();
    assert_eq!(accounts.len(), 2);
    for account in accounts {
        assert!(account.get("apiKey").is_none());
        assert!(account["apiKeyHint"].as_str().unwrap().starts_with("••••"));
    }

    let response = get(&app, "/api/binotel-accounts").await;
    assert_eq!(response.body.as_array().unwrap().len(), 3);

    let response = get(&app, &format!("/api/binotel-accounts?organizationId={}", ORG_LVIV)).await;
    assert_eq!(response.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_organization_is_404() {
    let app = app();
    let id = uuid::Uuid::new_v4();

    let response = get(&app, &format!("/api/organizations/{}", id)).await;
    assert_eq!(error_code(&response), "organization_not_found");

    let response = get(&app, &format!("/api/organizations/{}/binotel-accounts", id)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = get(&app, &format!("/api/binotel-accounts/{}", id)).await;
    assert_eq!(error_code(&response), "binotel_account_not_found");
}

#[tokio::test]
async fn health_reports_data_source() {
    let response = get(&app(), "/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["dataSource"], "memory");
}
