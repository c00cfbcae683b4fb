#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use chrono_tz::Tz;
    use frontdesk_analytics::mock::RecordingTracker;
    use frontdesk_common::BackgroundTasks;
    use frontdesk_config::{SiteConfig, SmtpConfig};
    use frontdesk_mail::templates::{
        SUBJECT_BOOKING_ADMIN, SUBJECT_BOOKING_CONFIRMED, SUBJECT_CANCELLED,
        SUBJECT_CANCELLED_ADMIN,
    };
    use frontdesk_mail::transport::mock::RecordingTransport;
    use frontdesk_mail::Notifier;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::handlers::{BookingState, BOOKING_CANCELLED, BOOKING_NOT_FOUND, SLOT_TAKEN};
    use crate::logic::SlotBook;
    use crate::provider::mock::InMemoryCalendar;
    use crate::routes::routes;

    const SENTINEL: &str = "available";

    struct Harness {
        calendar: Arc<InMemoryCalendar>,
        transport: Arc<RecordingTransport>,
        tracker: Arc<RecordingTracker>,
        app: axum::Router,
    }

    fn harness() -> Harness {
        let calendar = Arc::new(InMemoryCalendar::new("UTC"));
        let transport = Arc::new(RecordingTransport::new());
        let tracker = Arc::new(RecordingTracker::new());
        let smtp = SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            send_from: "hello@example.com".into(),
            send_from_alias: None,
            password: "pw".into(),
        };
        let site = SiteConfig {
            base_url: "https://studio.example.com".into(),
            brand_name: "Studio".into(),
        };
        let state = BookingState {
            book: Arc::new(SlotBook::new(calendar.clone(), SENTINEL, Tz::UTC, false)),
            notifier: Arc::new(Notifier::new(transport.clone(), &smtp, &site)),
            tracker: Some(tracker.clone()),
            tasks: BackgroundTasks::default(),
        };
        Harness {
            calendar,
            transport,
            tracker,
            app: routes(Arc::new(state)),
        }
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    /// Background sends finish shortly after the response.
    async fn wait_for_emails(transport: &RecordingTransport, count: usize) {
        for _ in 0..100 {
            if transport.sent().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} emails, saw {}", count, transport.sent().len());
    }

    fn hour(h: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 1, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_availability_lists_open_slots_for_the_day() {
        let h = harness();
        h.calendar.insert("evt2", SENTINEL, hour(13), hour(14));
        h.calendar.insert("evt1", SENTINEL, hour(9), hour(10));
        h.calendar.insert("busy", "Consultation: Bob", hour(11), hour(12));

        let request = Request::builder()
            .uri("/booking/availability?date=2025-09-01")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&h.app, request).await;

        assert_eq!(status, StatusCode::OK);
        let slots = body.as_array().unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0]["id"], "evt1");
        assert_eq!(slots[0]["start"], "2025-09-01T09:00:00Z");
        assert_eq!(slots[1]["id"], "evt2");
    }

    #[tokio::test]
    async fn test_availability_validates_date() {
        let h = harness();
        for (uri, message) in [
            ("/booking/availability", "date query parameter is required"),
            ("/booking/availability?date=01-09-2025", "invalid date format, use YYYY-MM-DD"),
        ] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let (status, body) = send(&h.app, request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], message);
        }
    }

    #[tokio::test]
    async fn test_book_creates_booking_and_notifies() {
        let h = harness();
        h.calendar.insert("evt1", SENTINEL, hour(9), hour(10));

        let (status, body) = send(
            &h.app,
            json_request(
                "POST",
                "/booking/book",
                serde_json::json!({
                    "eventId": "evt1",
                    "name": "Ada",
                    "email": "ada@example.com",
                    "notes": "hi",
                    "ga_client_id": "555.777"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], "evt1");
        assert_eq!(body["summary"], "Consultation: Ada");
        assert!(body.get("cancellationToken").is_none());
        assert!(!body.to_string().contains("cancellation_token"));

        wait_for_emails(&h.transport, 2).await;
        assert_eq!(h.transport.sent_with_subject(SUBJECT_BOOKING_CONFIRMED).len(), 1);
        let admin = h.transport.sent_with_subject(SUBJECT_BOOKING_ADMIN);
        assert_eq!(admin[0].to, vec!["hello+booking@example.com"]);

        let token = h.calendar.slot("evt1").unwrap().cancellation_token().unwrap().to_string();
        let confirmation = &h.transport.sent_with_subject(SUBJECT_BOOKING_CONFIRMED)[0];
        assert!(confirmation.html_body.contains(&token));

        tokio::time::sleep(Duration::from_millis(20)).await;
        let events = h.tracker.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].transaction_id, "evt1");
        assert_eq!(events[0].client_id.as_deref(), Some("555.777"));
    }

    #[tokio::test]
    async fn test_book_taken_slot_is_conflict() {
        let h = harness();
        h.calendar.insert("evt1", SENTINEL, hour(9), hour(10));
        let request = || {
            json_request(
                "POST",
                "/booking/book",
                serde_json::json!({ "eventId": "evt1", "name": "A", "email": "a@x.com" }),
            )
        };

        let (first, _) = send(&h.app, request()).await;
        assert_eq!(first, StatusCode::CREATED);
        let (second, body) = send(&h.app, request()).await;
        assert_eq!(second, StatusCode::CONFLICT);
        assert_eq!(body["message"], SLOT_TAKEN);
    }

    #[tokio::test]
    async fn test_book_validates_fields() {
        let h = harness();
        let (status, body) = send(
            &h.app,
            json_request("POST", "/booking/book", serde_json::json!({ "eventId": "evt1", "name": "A" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Bad Request: Name, email, and eventId are required");

        let (status, body) = send(
            &h.app,
            json_request(
                "POST",
                "/booking/book",
                serde_json::json!({ "eventId": "evt1", "name": "A", "email": "not-an-address" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid email address");
    }

    #[tokio::test]
    async fn test_calendar_outage_is_500() {
        let h = harness();
        h.calendar.set_unavailable(true);
        let (status, body) = send(
            &h.app,
            json_request(
                "POST",
                "/booking/book",
                serde_json::json!({ "eventId": "evt1", "name": "A", "email": "a@x.com" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_cancel_releases_and_notifies() {
        let h = harness();
        h.calendar.insert("evt1", SENTINEL, hour(9), hour(10));
        let (status, _) = send(
            &h.app,
            json_request(
                "POST",
                "/booking/book",
                serde_json::json!({ "eventId": "evt1", "name": "Ada", "email": "ada@example.com" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let token = h.calendar.slot("evt1").unwrap().cancellation_token().unwrap().to_string();

        let (status, body) = send(
            &h.app,
            json_request("POST", "/booking/cancel", serde_json::json!({ "token": token })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], BOOKING_CANCELLED);
        assert_eq!(h.calendar.slot("evt1").unwrap().summary, SENTINEL);

        wait_for_emails(&h.transport, 4).await;
        let cancelled = h.transport.sent_with_subject(SUBJECT_CANCELLED);
        assert_eq!(cancelled[0].to, vec!["ada@example.com"]);
        assert_eq!(h.transport.sent_with_subject(SUBJECT_CANCELLED_ADMIN).len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_twice_is_not_found() {
        let h = harness();
        h.calendar.insert("evt1", SENTINEL, hour(9), hour(10));
        let (status, _) = send(
            &h.app,
            json_request(
                "POST",
                "/booking/book",
                serde_json::json!({ "eventId": "evt1", "name": "Ada", "email": "ada@example.com" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let token = h.calendar.slot("evt1").unwrap().cancellation_token().unwrap().to_string();
        let cancel = || json_request("POST", "/booking/cancel", serde_json::json!({ "token": token }));

        let (status, _) = send(&h.app, cancel()).await;
        assert_eq!(status, StatusCode::OK);
        let writes = h.calendar.update_count();

        let (status, body) = send(&h.app, cancel()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], BOOKING_NOT_FOUND);
        assert_eq!(h.calendar.update_count(), writes);

        wait_for_emails(&h.transport, 4).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(h.transport.sent_with_subject(SUBJECT_CANCELLED).len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_unknown_or_missing_token() {
        let h = harness();
        let (status, body) = send(
            &h.app,
            json_request("POST", "/booking/cancel", serde_json::json!({ "token": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], BOOKING_NOT_FOUND);

        let (status, body) = send(&h.app, json_request("POST", "/booking/cancel", serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Cancellation token is required");
    }
}
