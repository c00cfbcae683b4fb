// --- File: crates/frontdesk_gcal/src/service.rs ---
//! Google Calendar adapter.
//!
//! Talks to the Calendar v3 REST API with `reqwest`, using the
//! `google-calendar3` types as the wire model. Going over REST directly lets
//! updates carry an `If-Match` header, which the generated hub cannot send.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use frontdesk_common::gcp::CALENDAR_SCOPE;
use frontdesk_common::{error_body, BoxFuture, TokenProvider};
use google_calendar3::api::{
    Calendar, ConferenceData, ConferenceSolutionKey, CreateConferenceRequest, Event,
    EventDateTime, Events,
};
use reqwest::{header, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::provider::{CalendarError, CalendarProvider, CalendarSlot, ConferenceChange};

pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Upper bound on events fetched per page when listing a day.
const PAGE_SIZE: &str = "250";

/// Google Calendar service implementation, scoped to one calendar.
pub struct GoogleCalendarService {
    client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    calendar_id: String,
    base_url: String,
}

impl GoogleCalendarService {
    pub fn new(client: reqwest::Client, tokens: Arc<dyn TokenProvider>, calendar_id: &str) -> Self {
        Self {
            client,
            tokens,
            calendar_id: calendar_id.to_string(),
            base_url: CALENDAR_API_BASE.to_string(),
        }
    }

    /// Points the adapter at another API root, e.g. a local stub.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// `<base>/calendars/<calendar id>/<segments...>`, percent-encoding each segment.
    fn calendar_url(&self, segments: &[&str]) -> Result<Url, CalendarError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CalendarError::InvalidEvent(format!("bad API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| CalendarError::InvalidEvent("API base URL cannot have a path".into()))?
            .pop_if_empty()
            .push("calendars")
            .push(&self.calendar_id)
            .extend(segments);
        Ok(url)
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, CalendarError> {
        let token = self
            .tokens
            .access_token(&[CALENDAR_SCOPE])
            .await
            .map_err(|e| CalendarError::Auth(e.to_string()))?;
        Ok(request.bearer_auth(token))
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CalendarError> {
        let response = self.authorized(request).await?.send().await?;
        let status = response.status();
        match status {
            s if s.is_success() => Ok(response.json::<T>().await?),
            StatusCode::NOT_FOUND | StatusCode::GONE => Err(CalendarError::NotFound),
            StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => Err(CalendarError::Conflict),
            _ => Err(CalendarError::Api {
                status: status.as_u16(),
                message: error_body(response).await,
            }),
        }
    }
}

fn rfc3339(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Converts a Google event; all-day events (no `dateTime`) are rejected.
pub fn slot_from_event(event: Event) -> Result<CalendarSlot, CalendarError> {
    let raw = serde_json::to_value(&event).ok();
    let id = event
        .id
        .ok_or_else(|| CalendarError::InvalidEvent("event without id".into()))?;
    let start = event
        .start
        .and_then(|start| start.date_time)
        .ok_or_else(|| CalendarError::InvalidEvent(format!("event {} has no start time", id)))?;
    let end = event
        .end
        .and_then(|end| end.date_time)
        .ok_or_else(|| CalendarError::InvalidEvent(format!("event {} has no end time", id)))?;

    let video_entry = event
        .conference_data
        .and_then(|data| data.entry_points)
        .and_then(|entries| {
            entries
                .into_iter()
                .find(|entry| entry.entry_point_type.as_deref() == Some("video"))
                .and_then(|entry| entry.uri)
        });

    Ok(CalendarSlot {
        id,
        summary: event.summary.unwrap_or_default(),
        description: event.description.filter(|d| !d.is_empty()),
        start,
        end,
        etag: event.etag,
        private_properties: event
            .extended_properties
            .and_then(|props| props.private)
            .unwrap_or_default(),
        meet_link: event.hangout_link.or(video_entry),
        raw,
    })
}

/// Full replacement body for a PUT.
///
/// Starts from the event as it was fetched and overwrites only what the
/// booking flow owns: title, description, times, private properties and
/// conference data. Attendees are always cleared. Everything else the
/// calendar owner set on the event is sent back unchanged.
pub fn event_for_update(slot: &CalendarSlot, conference: &ConferenceChange) -> Event {
    let mut event: Event = slot
        .raw
        .clone()
        .and_then(|raw| serde_json::from_value(raw).ok())
        .unwrap_or_default();

    let time = |previous: Option<EventDateTime>, at: DateTime<Utc>| EventDateTime {
        date_time: Some(at),
        time_zone: previous
            .and_then(|previous| previous.time_zone)
            .or_else(|| Some("UTC".to_string())),
        ..Default::default()
    };

    event.id = Some(slot.id.clone());
    event.summary = Some(slot.summary.clone());
    event.description = slot.description.clone();
    event.start = Some(time(event.start.take(), slot.start));
    event.end = Some(time(event.end.take(), slot.end));
    event.attendees = None;

    let mut properties = event.extended_properties.take().unwrap_or_default();
    properties.private = Some(slot.private_properties.clone());
    event.extended_properties = Some(properties);

    match conference {
        ConferenceChange::Keep => {}
        ConferenceChange::Create { request_id } => {
            event.conference_data = Some(ConferenceData {
                create_request: Some(CreateConferenceRequest {
                    request_id: Some(request_id.clone()),
                    conference_solution_key: Some(ConferenceSolutionKey {
                        type_: Some("hangoutsMeet".to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            });
        }
        ConferenceChange::Remove => {
            // An absent field keeps the conference; only an empty object drops it.
            event.conference_data = Some(ConferenceData::default());
            event.hangout_link = None;
        }
    }
    event
}

impl CalendarProvider for GoogleCalendarService {
    fn time_zone(&self) -> BoxFuture<'_, String, CalendarError> {
        Box::pin(async move {
            let url = self.calendar_url(&[])?;
            let calendar: Calendar = self.execute(self.client.get(url)).await?;
            calendar
                .time_zone
                .ok_or_else(|| CalendarError::InvalidEvent("calendar has no time zone".into()))
        })
    }

    fn list_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        query: &str,
    ) -> BoxFuture<'_, Vec<CalendarSlot>, CalendarError> {
        let query = query.to_string();
        Box::pin(async move {
            let url = self.calendar_url(&["events"])?;
            let time_min = rfc3339(start);
            let time_max = rfc3339(end);
            let mut slots = Vec::new();
            let mut page_token: Option<String> = None;

            loop {
                let mut request = self.client.get(url.clone()).query(&[
                    ("timeMin", time_min.as_str()),
                    ("timeMax", time_max.as_str()),
                    ("q", query.as_str()),
                    ("singleEvents", "true"),
                    ("orderBy", "startTime"),
                    ("maxResults", PAGE_SIZE),
                ]);
                if let Some(token) = &page_token {
                    request = request.query(&[("pageToken", token.as_str())]);
                }

                let page: Events = self.execute(request).await?;
                for event in page.items.unwrap_or_default() {
                    match slot_from_event(event) {
                        Ok(slot) => slots.push(slot),
                        Err(e) => debug!("Skipping event in availability listing: {}", e),
                    }
                }

                page_token = page.next_page_token;
                if page_token.is_none() {
                    break;
                }
            }

            debug!("Listed {} events between {} and {}", slots.len(), time_min, time_max);
            Ok(slots)
        })
    }

    fn get_event(&self, event_id: &str) -> BoxFuture<'_, CalendarSlot, CalendarError> {
        let event_id = event_id.to_string();
        Box::pin(async move {
            let url = self.calendar_url(&["events", &event_id])?;
            let event: Event = self.execute(self.client.get(url)).await?;
            slot_from_event(event)
        })
    }

    fn find_by_private_property(
        &self,
        key: &str,
        value: &str,
    ) -> BoxFuture<'_, Option<CalendarSlot>, CalendarError> {
        let filter = format!("{}={}", key, value);
        Box::pin(async move {
            let url = self.calendar_url(&["events"])?;
            let request = self.client.get(url).query(&[
                ("privateExtendedProperty", filter.as_str()),
                ("singleEvents", "true"),
                ("maxResults", "1"),
            ]);
            let page: Events = self.execute(request).await?;
            page.items
                .unwrap_or_default()
                .into_iter()
                .next()
                .map(slot_from_event)
                .transpose()
        })
    }

    fn update_event(
        &self,
        slot: &CalendarSlot,
        if_match: Option<&str>,
        conference: ConferenceChange,
    ) -> BoxFuture<'_, CalendarSlot, CalendarError> {
        let body = event_for_update(slot, &conference);
        let event_id = slot.id.clone();
        let if_match = if_match.map(str::to_string);
        Box::pin(async move {
            let url = self.calendar_url(&["events", &event_id])?;
            let mut request = self.client.put(url).json(&body);
            if conference != ConferenceChange::Keep {
                // version 0 makes the API ignore conferenceData entirely
                request = request.query(&[("conferenceDataVersion", "1")]);
            }
            if let Some(etag) = &if_match {
                request = request.header(header::IF_MATCH, etag);
            }
            let event: Event = self.execute(request).await?;
            info!("🗓️ Updated calendar event {}", event_id);
            slot_from_event(event)
        })
    }
}
