// File: crates/frontdesk_gcal/src/logic.rs
//! Booking slot lifecycle.
//!
//! An open slot is a calendar event titled with the sentinel summary. Claiming
//! rewrites it into a booking guarded by the event's etag; releasing puts the
//! sentinel back. The calendar is the only source of truth, and its
//! optimistic-concurrency check is the only lock.

use std::sync::Arc;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::provider::{
    CalendarError, CalendarProvider, CalendarSlot, ConferenceChange, CLIENT_EMAIL_KEY,
    CLIENT_NAME_KEY, TOKEN_KEY,
};

#[derive(Error, Debug)]
pub enum BookingError {
    /// The slot does not exist, is no longer open, or the token matches nothing.
    #[error("slot not found")]
    SlotNotFound,
    #[error("cancellation token is required")]
    MissingToken,
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Who is booking.
#[derive(Debug, Clone)]
pub struct ClientDetails {
    pub name: String,
    pub email: String,
    pub notes: String,
}

// --- HTTP data structures ---

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Deserialize, Debug)]
pub struct AvailabilityQuery {
    /// Day to list, `YYYY-MM-DD`, interpreted in the calendar's timezone.
    pub date: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AvailableSlot {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<&CalendarSlot> for AvailableSlot {
    fn from(slot: &CalendarSlot) -> Self {
        Self {
            id: slot.id.clone(),
            start: slot.start,
            end: slot.end,
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Default)]
pub struct BookSlotRequest {
    #[serde(rename = "eventId", default)]
    pub event_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub notes: String,
    /// GA4 client id from the `_ga` cookie, forwarded to analytics.
    #[serde(default)]
    pub ga_client_id: Option<String>,
    #[serde(default)]
    pub ga_session_id: Option<String>,
}

/// Public view of a booked event. The cancellation token is deliberately
/// absent; it only travels by email.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookedEvent {
    pub id: String,
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meet_link: Option<String>,
    pub status: String,
}

impl From<&CalendarSlot> for BookedEvent {
    fn from(slot: &CalendarSlot) -> Self {
        Self {
            id: slot.id.clone(),
            summary: slot.summary.clone(),
            start: slot.start,
            end: slot.end,
            meet_link: slot.meet_link.clone(),
            status: "confirmed".to_string(),
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Default)]
pub struct CancelBookingRequest {
    #[serde(default)]
    pub token: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

// --- Day boundaries and availability ---

/// The instant `date` begins in `tz`. When local midnight does not exist
/// (a DST gap), the first instant of the day is used instead.
fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    let local = match tz.from_local_datetime(&midnight) {
        LocalResult::Single(at) => Some(at),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => (1..=3)
            .map(|hours| midnight + Duration::hours(hours))
            .find_map(|candidate| tz.from_local_datetime(&candidate).earliest()),
    };
    local
        .map(|at| at.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// `[start of date, start of next day)` in `tz`, as UTC instants. Days that
/// contain a DST switch are 23 or 25 hours long.
pub fn day_bounds(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (start_of_day(date, tz), start_of_day(next, tz))
}

/// Keeps events whose title is exactly `sentinel`, ordered by start, and
/// drops any slot overlapping one already kept, so the result is a sequence
/// of disjoint intervals.
pub fn normalize_availability(mut slots: Vec<CalendarSlot>, sentinel: &str) -> Vec<CalendarSlot> {
    slots.retain(|slot| slot.summary == sentinel && slot.start < slot.end);
    slots.sort_by(|a, b| (a.start, a.end, &a.id).cmp(&(b.start, b.end, &b.id)));

    let mut open: Vec<CalendarSlot> = Vec::with_capacity(slots.len());
    for slot in slots {
        match open.last() {
            Some(previous) if slot.start < previous.end => {
                warn!(
                    "Dropping slot {} overlapping slot {}",
                    slot.id, previous.id
                );
            }
            _ => open.push(slot),
        }
    }
    open
}

fn booking_description(client: &ClientDetails) -> String {
    format!(
        "Client Name: {}\nClient Email: {}\n\nNotes:\n{}",
        client.name, client.email, client.notes
    )
}

fn claim_error(err: CalendarError) -> BookingError {
    match err {
        CalendarError::NotFound | CalendarError::Conflict => BookingError::SlotNotFound,
        other => BookingError::Calendar(other),
    }
}

/// The slot lifecycle over one calendar.
pub struct SlotBook {
    provider: Arc<dyn CalendarProvider>,
    sentinel: String,
    time_zone: Tz,
    conference_links: bool,
}

impl SlotBook {
    pub fn new(
        provider: Arc<dyn CalendarProvider>,
        sentinel: &str,
        time_zone: Tz,
        conference_links: bool,
    ) -> Self {
        Self {
            provider,
            sentinel: sentinel.to_string(),
            time_zone,
            conference_links,
        }
    }

    /// Builds a book using the calendar's own timezone, falling back to UTC
    /// when it cannot be read.
    pub async fn connect(
        provider: Arc<dyn CalendarProvider>,
        sentinel: &str,
        conference_links: bool,
    ) -> Self {
        let time_zone = match provider.time_zone().await {
            Ok(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                warn!("Unknown calendar time zone {:?}, using UTC", name);
                Tz::UTC
            }),
            Err(e) => {
                warn!("Could not read calendar time zone, using UTC: {}", e);
                Tz::UTC
            }
        };
        info!("✅ Calendar time zone: {}", time_zone.name());
        Self::new(provider, sentinel, time_zone, conference_links)
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Open slots on `day`, ordered and non-overlapping.
    pub async fn list_availability(&self, day: NaiveDate) -> Result<Vec<CalendarSlot>, BookingError> {
        let (start, end) = day_bounds(day, self.time_zone);
        let events = self.provider.list_events(start, end, &self.sentinel).await?;
        Ok(normalize_availability(events, &self.sentinel))
    }

    /// Turns the open slot `slot_id` into a booking for `client`.
    ///
    /// Fails with [`BookingError::SlotNotFound`] when the slot is missing, is
    /// no longer titled with the sentinel, or changes between read and write.
    pub async fn claim(
        &self,
        slot_id: &str,
        client: &ClientDetails,
    ) -> Result<CalendarSlot, BookingError> {
        let slot = self.provider.get_event(slot_id).await.map_err(claim_error)?;
        if slot.summary != self.sentinel {
            info!("Slot {} is not open (title {:?})", slot_id, slot.summary);
            return Err(BookingError::SlotNotFound);
        }
        if slot.etag.is_none() {
            warn!("Slot {} has no etag, update will be unconditional", slot_id);
        }

        let token = Uuid::new_v4().to_string();
        let mut booked = slot.clone();
        booked.summary = format!("Consultation: {}", client.name);
        booked.description = Some(booking_description(client));
        booked
            .private_properties
            .insert(TOKEN_KEY.to_string(), token);
        booked
            .private_properties
            .insert(CLIENT_NAME_KEY.to_string(), client.name.clone());
        booked
            .private_properties
            .insert(CLIENT_EMAIL_KEY.to_string(), client.email.clone());

        let conference = if self.conference_links {
            let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
            ConferenceChange::Create {
                request_id: format!("{}-booking-{}", slot_id, nanos),
            }
        } else {
            ConferenceChange::Keep
        };
        let requested_conference = conference != ConferenceChange::Keep;

        let mut updated = self
            .provider
            .update_event(&booked, slot.etag.as_deref(), conference)
            .await
            .map_err(claim_error)?;

        // Conference creation can finish after the update returns.
        if requested_conference && updated.meet_link.is_none() {
            match self.provider.get_event(slot_id).await {
                Ok(fresh) => updated = fresh,
                Err(e) => warn!("Could not re-read slot {} for its meet link: {}", slot_id, e),
            }
        }

        info!("✅ Slot {} booked", slot_id);
        Ok(updated)
    }

    /// Returns the slot holding `token` to the open state. The returned slot
    /// is the booking as it was before the reset.
    pub async fn release(&self, token: &str) -> Result<CalendarSlot, BookingError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(BookingError::MissingToken);
        }

        let slot = self
            .provider
            .find_by_private_property(TOKEN_KEY, token)
            .await?
            .filter(|slot| slot.cancellation_token() == Some(token))
            .ok_or(BookingError::SlotNotFound)?;

        let mut reset = slot.clone();
        reset.summary = self.sentinel.clone();
        reset.description = None;
        for key in [TOKEN_KEY, CLIENT_NAME_KEY, CLIENT_EMAIL_KEY] {
            reset.private_properties.remove(key);
        }
        let conference = if slot.meet_link.is_some() {
            ConferenceChange::Remove
        } else {
            ConferenceChange::Keep
        };

        self.provider
            .update_event(&reset, slot.etag.as_deref(), conference)
            .await
            .map_err(claim_error)?;

        info!("✅ Slot {} released", slot.id);
        Ok(slot)
    }
}
