// --- File: crates/frontdesk_mail/src/templates.rs ---
//! Templated notifications.
//!
//! [`Notifier`] turns booking, contact and idea events into HTML emails and
//! hands them to a [`MailTransport`]. Every user-supplied value is HTML-escaped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use frontdesk_config::{SiteConfig, SmtpConfig};

use crate::ical::{render_invite, Invite, INVITE_CONTENT_TYPE, INVITE_FILENAME};
use crate::transport::{plus_alias, EmailAttachment, MailError, MailTransport, OutgoingEmail};

pub const SUBJECT_BOOKING_CONFIRMED: &str = "Your consultation is confirmed!";
pub const SUBJECT_BOOKING_ADMIN: &str = "New Consultation Booked!";
pub const SUBJECT_CANCELLED: &str = "Your consultation has been cancelled";
pub const SUBJECT_CANCELLED_ADMIN: &str = "Consultation Cancelled by Client";

const DATE_FORMAT: &str = "%A, %B %-d, %Y";
const TIME_FORMAT: &str = "%H:%M";

/// Everything a booking or cancellation email needs to know about the slot.
#[derive(Debug, Clone)]
pub struct BookingNotice {
    pub event_id: String,
    pub client_name: String,
    pub client_email: String,
    pub notes: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Zone the times are shown in, normally the calendar's own.
    pub time_zone: Tz,
    pub meet_link: Option<String>,
    /// Present for confirmations; drives the cancellation link.
    pub cancellation_token: Option<String>,
}

/// A contact form submission.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub send_copy_to_self: bool,
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escapes and keeps line breaks visible.
fn escape_multiline(value: &str) -> String {
    escape_html(value).replace("\r\n", "<br>").replace('\n', "<br>")
}

fn wrap(title: &str, inner: &str) -> String {
    format!(
        "<!DOCTYPE html><html><body style=\"font-family:Arial,Helvetica,sans-serif;color:#222;line-height:1.5\">\
<h2>{}</h2>{}</body></html>",
        escape_html(title),
        inner
    )
}

impl BookingNotice {
    fn when(&self) -> String {
        let start = self.start.with_timezone(&self.time_zone);
        let end = self.end.with_timezone(&self.time_zone);
        format!(
            "{}, {} – {} ({})",
            start.format(DATE_FORMAT),
            start.format(TIME_FORMAT),
            end.format(TIME_FORMAT),
            self.time_zone.name()
        )
    }

    fn meet_row(&self) -> String {
        match &self.meet_link {
            Some(link) => format!(
                "<p><strong>Video call:</strong> <a href=\"{0}\">{0}</a></p>",
                escape_html(link)
            ),
            None => String::new(),
        }
    }
}

pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    send_from: String,
    sender_name: String,
    site_url: String,
    brand_name: String,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>, smtp: &SmtpConfig, site: &SiteConfig) -> Self {
        Self {
            transport,
            send_from: smtp.send_from.clone(),
            sender_name: smtp.sender_name().to_string(),
            site_url: site.base_url.trim_end_matches('/').to_string(),
            brand_name: site.brand_name.clone(),
        }
    }

    /// Admin inbox for a notification category, e.g. `hello+booking@example.com`.
    pub fn admin_address(&self, tag: &str) -> String {
        plus_alias(&self.send_from, tag)
    }

    pub fn cancellation_url(&self, token: &str) -> String {
        format!("{}/booking/cancel?token={}", self.site_url, token)
    }

    async fn deliver(&self, email: OutgoingEmail) -> Result<(), MailError> {
        self.transport.send(email).await
    }

    /// Client confirmation with an `invite.ics` meeting request.
    pub async fn send_booking_confirmation(&self, notice: &BookingNotice) -> Result<(), MailError> {
        let cancel_block = match &notice.cancellation_token {
            Some(token) => format!(
                "<p>Need to cancel? <a href=\"{0}\">{0}</a></p>",
                escape_html(&self.cancellation_url(token))
            ),
            None => String::new(),
        };
        let inner = format!(
            "<p>Hi {name},</p>\
<p>Your consultation with {brand} is confirmed.</p>\
<p><strong>When:</strong> {when}</p>{meet}{cancel}\
<p>A calendar invitation is attached.</p>",
            name = escape_html(&notice.client_name),
            brand = escape_html(&self.brand_name),
            when = escape_html(&notice.when()),
            meet = notice.meet_row(),
            cancel = cancel_block,
        );

        let uid = format!("{}@{}", notice.event_id, domain_of(&self.send_from));
        let summary = format!("Consultation with {}", self.brand_name);
        let description = match &notice.meet_link {
            Some(link) => format!("Join the video call: {}", link),
            None => format!("Consultation with {}", self.brand_name),
        };
        let ics = render_invite(&Invite {
            uid: &uid,
            stamp: Utc::now(),
            start: notice.start,
            end: notice.end,
            summary: &summary,
            description: &description,
            location: notice.meet_link.as_deref().unwrap_or("Online"),
            organizer_name: &self.sender_name,
            organizer_email: &self.send_from,
            attendee_name: &notice.client_name,
            attendee_email: &notice.client_email,
        });

        self.deliver(OutgoingEmail {
            to: vec![notice.client_email.clone()],
            subject: SUBJECT_BOOKING_CONFIRMED.to_string(),
            html_body: wrap(SUBJECT_BOOKING_CONFIRMED, &inner),
            attachment: Some(EmailAttachment {
                filename: INVITE_FILENAME.to_string(),
                content_type: INVITE_CONTENT_TYPE.to_string(),
                content: ics.into_bytes(),
            }),
            ..Default::default()
        })
        .await
    }

    pub async fn send_booking_admin_notice(&self, notice: &BookingNotice) -> Result<(), MailError> {
        let inner = format!(
            "<p><strong>Client:</strong> {name} &lt;{email}&gt;</p>\
<p><strong>When:</strong> {when}</p>{meet}\
<p><strong>Notes:</strong><br>{notes}</p>\
<p><strong>Event id:</strong> {id}</p>",
            name = escape_html(&notice.client_name),
            email = escape_html(&notice.client_email),
            when = escape_html(&notice.when()),
            meet = notice.meet_row(),
            notes = escape_multiline(&notice.notes),
            id = escape_html(&notice.event_id),
        );
        self.deliver(OutgoingEmail {
            to: vec![self.admin_address("booking")],
            reply_to: Some(notice.client_email.clone()),
            subject: SUBJECT_BOOKING_ADMIN.to_string(),
            html_body: wrap(SUBJECT_BOOKING_ADMIN, &inner),
            ..Default::default()
        })
        .await
    }

    pub async fn send_cancellation_confirmation(
        &self,
        notice: &BookingNotice,
    ) -> Result<(), MailError> {
        let inner = format!(
            "<p>Hi {name},</p>\
<p>Your consultation on {when} has been cancelled.</p>\
<p>You are welcome to book a new time at <a href=\"{site}\">{site}</a>.</p>",
            name = escape_html(&notice.client_name),
            when = escape_html(&notice.when()),
            site = escape_html(&self.site_url),
        );
        self.deliver(OutgoingEmail {
            to: vec![notice.client_email.clone()],
            subject: SUBJECT_CANCELLED.to_string(),
            html_body: wrap(SUBJECT_CANCELLED, &inner),
            ..Default::default()
        })
        .await
    }

    pub async fn send_cancellation_admin_notice(
        &self,
        notice: &BookingNotice,
    ) -> Result<(), MailError> {
        let inner = format!(
            "<p>{name} &lt;{email}&gt; cancelled their consultation.</p>\
<p><strong>Was scheduled for:</strong> {when}</p>\
<p>The slot is available again.</p>",
            name = escape_html(&notice.client_name),
            email = escape_html(&notice.client_email),
            when = escape_html(&notice.when()),
        );
        self.deliver(OutgoingEmail {
            to: vec![self.admin_address("cancellation")],
            subject: SUBJECT_CANCELLED_ADMIN.to_string(),
            html_body: wrap(SUBJECT_CANCELLED_ADMIN, &inner),
            ..Default::default()
        })
        .await
    }

    pub async fn send_contact_message(&self, contact: &ContactMessage) -> Result<(), MailError> {
        let subject = format!("New Contact Message from {}", contact.name);
        let inner = format!(
            "<p><strong>Name:</strong> {name}</p>\
<p><strong>Email:</strong> {email}</p>\
<p><strong>Message:</strong><br>{message}</p>",
            name = escape_html(&contact.name),
            email = escape_html(&contact.email),
            message = escape_multiline(&contact.message),
        );
        let cc = if contact.send_copy_to_self {
            vec![contact.email.clone()]
        } else {
            Vec::new()
        };
        self.deliver(OutgoingEmail {
            to: vec![self.admin_address("contact")],
            cc,
            reply_to: Some(contact.email.clone()),
            html_body: wrap(&subject, &inner),
            subject,
            attachment: None,
        })
        .await
    }

    /// Sends generated ideas to `to`. Each idea is a `(title, summary)` pair.
    pub async fn send_ideas_digest<'a, I>(&self, to: &str, topic: &str, ideas: I) -> Result<(), MailError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let subject = format!("Your generated ideas for \"{}\"", topic);
        let items: String = ideas
            .into_iter()
            .map(|(title, summary)| {
                if summary.is_empty() {
                    format!("<li><strong>{}</strong></li>", escape_html(title))
                } else {
                    format!(
                        "<li><strong>{}</strong><br>{}</li>",
                        escape_html(title),
                        escape_html(summary)
                    )
                }
            })
            .collect();
        let inner = format!(
            "<p>Here are the ideas you generated for <em>{topic}</em>:</p><ol>{items}</ol>\
<p>Best regards,<br>{brand}</p>",
            topic = escape_html(topic),
            items = items,
            brand = escape_html(&self.brand_name),
        );
        self.deliver(OutgoingEmail {
            to: vec![to.to_string()],
            html_body: wrap(&subject, &inner),
            subject,
            ..Default::default()
        })
        .await
    }
}

fn domain_of(address: &str) -> &str {
    address.rsplit_once('@').map_or("localhost", |(_, domain)| domain)
}
