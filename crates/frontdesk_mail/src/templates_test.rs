use std::sync::Arc;

use chrono::{TimeZone, Utc};
use frontdesk_config::{SiteConfig, SmtpConfig};

use crate::templates::*;
use crate::transport::mock::RecordingTransport;

fn notifier() -> (Arc<RecordingTransport>, Notifier) {
    let transport = Arc::new(RecordingTransport::new());
    let smtp = SmtpConfig {
        host: "smtp.example.com".into(),
        port: 587,
        send_from: "hello@example.com".into(),
        send_from_alias: Some("Studio".into()),
        password: "pw".into(),
    };
    let site = SiteConfig {
        base_url: "https://studio.example.com/".into(),
        brand_name: "Studio".into(),
    };
    (transport.clone(), Notifier::new(transport, &smtp, &site))
}

fn notice() -> BookingNotice {
    BookingNotice {
        event_id: "evt1".into(),
        client_name: "Ada <script>".into(),
        client_email: "ada@example.org".into(),
        notes: "line one\nline two".into(),
        start: Utc.with_ymd_and_hms(2025, 9, 1, 7, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap(),
        time_zone: chrono_tz::Europe::Sofia,
        meet_link: None,
        cancellation_token: Some("tok-123".into()),
    }
}

#[tokio::test]
async fn test_confirmation_has_invite_and_cancel_link() {
    let (transport, notifier) = notifier();
    notifier.send_booking_confirmation(&notice()).await.unwrap();

    let sent = transport.sent_with_subject(SUBJECT_BOOKING_CONFIRMED);
    assert_eq!(sent.len(), 1);
    let email = &sent[0];
    assert_eq!(email.to, vec!["ada@example.org"]);
    assert!(email
        .html_body
        .contains("https://studio.example.com/booking/cancel?token=tok-123"));
    // Sofia is UTC+3 in September
    assert!(email.html_body.contains("10:00 – 11:00 (Europe/Sofia)"));
    assert!(email.html_body.contains("Ada &lt;script&gt;"));
    assert!(!email.html_body.contains("<script>"));

    let attachment = email.attachment.as_ref().expect("invite attached");
    assert_eq!(attachment.filename, "invite.ics");
    let ics = String::from_utf8(attachment.content.clone()).unwrap();
    assert!(ics.contains("UID:evt1@example.com"));
    assert!(ics.contains("DTSTART:20250901T070000Z"));
    assert!(ics.contains("mailto:ada@example.org"));
}

#[tokio::test]
async fn test_admin_notices_go_to_plus_aliases() {
    let (transport, notifier) = notifier();
    let notice = notice();
    notifier.send_booking_admin_notice(&notice).await.unwrap();
    notifier.send_cancellation_admin_notice(&notice).await.unwrap();
    notifier.send_cancellation_confirmation(&notice).await.unwrap();

    let booked = &transport.sent_with_subject(SUBJECT_BOOKING_ADMIN)[0];
    assert_eq!(booked.to, vec!["hello+booking@example.com"]);
    assert_eq!(booked.reply_to.as_deref(), Some("ada@example.org"));
    assert!(booked.html_body.contains("line one<br>line two"));

    let cancelled = &transport.sent_with_subject(SUBJECT_CANCELLED_ADMIN)[0];
    assert_eq!(cancelled.to, vec!["hello+cancellation@example.com"]);

    let client = &transport.sent_with_subject(SUBJECT_CANCELLED)[0];
    assert_eq!(client.to, vec!["ada@example.org"]);
    assert!(client.attachment.is_none());
}

#[tokio::test]
async fn test_contact_copy_to_self() {
    let (transport, notifier) = notifier();
    let mut contact = ContactMessage {
        name: "Grace".into(),
        email: "grace@example.org".into(),
        message: "Hello there".into(),
        send_copy_to_self: false,
    };
    notifier.send_contact_message(&contact).await.unwrap();
    contact.send_copy_to_self = true;
    notifier.send_contact_message(&contact).await.unwrap();

    let sent = transport.sent_with_subject("New Contact Message from Grace");
    assert_eq!(sent.len(), 2);
    assert!(sent[0].cc.is_empty());
    assert_eq!(sent[1].cc, vec!["grace@example.org"]);
    assert_eq!(sent[1].to, vec!["hello+contact@example.com"]);
}

#[tokio::test]
async fn test_ideas_digest() {
    let (transport, notifier) = notifier();
    notifier
        .send_ideas_digest(
            "reader@example.org",
            "rust & wasm",
            [("Ship it", "Why small releases win"), ("Bare title", "")],
        )
        .await
        .unwrap();

    let sent = transport.sent_with_subject("Your generated ideas for \"rust & wasm\"");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].html_body.contains("rust &amp; wasm"));
    assert!(sent[0].html_body.contains("<li><strong>Bare title</strong></li>"));
    assert!(sent[0].html_body.contains("<p>Best regards,<br>"));
    assert!(sent[0].html_body.is_ascii());
}

#[test]
fn test_escape_html() {
    assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
}
