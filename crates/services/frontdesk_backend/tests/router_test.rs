use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use frontdesk_analytics::mock::RecordingTracker;
use frontdesk_backend::app_state::AppState;
use frontdesk_backend::build_router;
use frontdesk_backend::service_factory::Adapters;
use frontdesk_blog::store::mock::InMemoryObjectStore;
use frontdesk_config::{load_config_from, AppConfig};
use frontdesk_gcal::provider::mock::InMemoryCalendar;
use frontdesk_ideas::generator::mock::ScriptedGenerator;
use frontdesk_mail::transport::mock::RecordingTransport;
use serde_json::{json, Value};
use tower::ServiceExt;

fn config() -> AppConfig {
    let vars: HashMap<String, String> = [
        ("CALENDAR_ID", "studio@example.com"),
        ("GCAL_AVAILABLE_SLOT_SUMMARY", "available"),
        ("SMTP_HOST", "smtp.example.com"),
        ("SMTP_PORT", "587"),
        ("SEND_FROM", "hello@example.com"),
        ("SMTP_PASS", "pw"),
        ("BLOG_BUCKET", "blog"),
        ("GCP_PROJECT_ID", "acme"),
        ("GCP_LOCATION", "europe-west1"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    load_config_from(&vars, Path::new("/nonexistent/frontdesk-config")).expect("test config")
}

struct TestApp {
    router: axum::Router,
    calendar: Arc<InMemoryCalendar>,
    transport: Arc<RecordingTransport>,
}

async fn test_app() -> TestApp {
    let calendar = Arc::new(InMemoryCalendar::new("UTC"));
    calendar.insert(
        "evt1",
        "available",
        Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap(),
    );
    let store = Arc::new(InMemoryObjectStore::new());
    store.put(
        "my-post.md",
        "---\ntitle: My Post\ndate: 2025-05-05\npublished: true\n---\nHello\n",
    );
    let transport = Arc::new(RecordingTransport::new());

    let adapters = Adapters {
        calendar: calendar.clone(),
        mail: transport.clone(),
        store: Some(store),
        generator: Some(Arc::new(ScriptedGenerator::replying(
            "[{\"title\":\"One\",\"summary\":\"First\"}]",
        ))),
        tracker: Some(Arc::new(RecordingTracker::new())),
    };
    let (state, refresher) = AppState::assemble(Arc::new(config()), adapters).await;
    // Refreshes are not needed here; the initial load already ran.
    if let Some(refresher) = refresher {
        refresher.stop().await;
    }
    TestApp {
        router: build_router(&state),
        calendar,
        transport,
    }
}

async fn call(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

#[tokio::test]
async fn test_routes_are_nested_under_api() {
    let app = test_app().await;

    let (status, body) = call(&app.router, "GET", "/api/booking/availability?date=2025-09-01", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "evt1");

    let (status, body) = call(&app.router, "GET", "/api/articles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["slug"], "my-post");

    let (status, body) = call(&app.router, "POST", "/api/generate-ideas", Some(json!({ "topic": "data" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ideas"][0]["title"], "One");

    let (status, body) = call(
        &app.router,
        "POST",
        "/api/contact",
        Some(json!({ "name": "Grace", "email": "grace@example.org", "message": "Hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Message sent successfully".to_string()));
    assert_eq!(app.transport.sent().len(), 1);

    let (status, _) = call(&app.router, "GET", "/booking/availability?date=2025-09-01", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_round_trip_through_router() {
    let app = test_app().await;
    let (status, _) = call(
        &app.router,
        "POST",
        "/api/booking/book",
        Some(json!({ "eventId": "evt1", "name": "A", "email": "a@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call(
        &app.router,
        "POST",
        "/api/booking/book",
        Some(json!({ "eventId": "evt1", "name": "B", "email": "b@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let token = app
        .calendar
        .slot("evt1")
        .and_then(|slot| slot.cancellation_token().map(str::to_string))
        .expect("booked slot carries a token");
    let (status, body) = call(&app.router, "POST", "/api/booking/cancel", Some(json!({ "token": token }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Booking cancelled successfully");

    let (_, body) = call(&app.router, "GET", "/api/booking/availability?date=2025-09-01", None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_cors_preflight_is_answered() {
    let app = test_app().await;
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/booking/book")
        .header("origin", "https://studio.example.com")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert!(response.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_likes_work_through_router() {
    let app = test_app().await;
    call(&app.router, "POST", "/api/articles/my-post/like", None).await;
    call(&app.router, "POST", "/api/articles/my-post/like", None).await;
    let (_, body) = call(&app.router, "DELETE", "/api/articles/my-post/like", None).await;
    assert_eq!(body["likes"], 1);
}
