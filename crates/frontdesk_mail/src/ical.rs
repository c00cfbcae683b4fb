// --- File: crates/frontdesk_mail/src/ical.rs ---
//! iCalendar (RFC 5545) meeting requests attached to booking confirmations.

use chrono::{DateTime, Utc};

pub const INVITE_FILENAME: &str = "invite.ics";
pub const INVITE_CONTENT_TYPE: &str = "text/calendar; charset=utf-8; method=REQUEST";

const PRODUCT_ID: &str = "-//frontdesk//booking//EN";
/// Content lines longer than this many octets are folded.
const MAX_LINE_OCTETS: usize = 75;

#[derive(Debug, Clone)]
pub struct Invite<'a> {
    pub uid: &'a str,
    pub stamp: DateTime<Utc>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub organizer_name: &'a str,
    pub organizer_email: &'a str,
    pub attendee_name: &'a str,
    pub attendee_email: &'a str,
}

fn format_utc(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escapes a TEXT value: backslash, semicolon, comma and newlines.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Quotes a parameter value such as `CN`. DQUOTE and control characters
/// cannot appear inside a quoted value and are dropped.
pub fn quote_param(value: &str) -> String {
    let inner: String = value
        .chars()
        .filter(|c| *c != '"' && !c.is_control())
        .collect();
    format!("\"{}\"", inner)
}

/// Appends `line` to `out`, folding it into CRLF + space continuation lines
/// so that no physical line exceeds 75 octets.
fn push_folded(out: &mut String, line: &str) {
    let mut budget = MAX_LINE_OCTETS;
    let mut used = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if used + len > budget {
            out.push_str("\r\n ");
            // the leading space counts against the continuation line
            budget = MAX_LINE_OCTETS - 1;
            used = 0;
        }
        out.push(c);
        used += len;
    }
    out.push_str("\r\n");
}

/// Renders a single-event `METHOD:REQUEST` calendar.
pub fn render_invite(invite: &Invite<'_>) -> String {
    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", PRODUCT_ID),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:REQUEST".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", invite.uid),
        format!("DTSTAMP:{}", format_utc(invite.stamp)),
        format!("DTSTART:{}", format_utc(invite.start)),
        format!("DTEND:{}", format_utc(invite.end)),
        format!("SUMMARY:{}", escape_text(invite.summary)),
        format!("DESCRIPTION:{}", escape_text(invite.description)),
        format!("LOCATION:{}", escape_text(invite.location)),
        format!(
            "ORGANIZER;CN={}:mailto:{}",
            quote_param(invite.organizer_name),
            invite.organizer_email
        ),
        format!(
            "ATTENDEE;CN={};ROLE=REQ-PARTICIPANT;PARTSTAT=ACCEPTED;RSVP=FALSE:mailto:{}",
            quote_param(invite.attendee_name),
            invite.attendee_email
        ),
        "STATUS:CONFIRMED".to_string(),
        "SEQUENCE:0".to_string(),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    let mut out = String::new();
    for line in &lines {
        push_folded(&mut out, line);
    }
    out
}
