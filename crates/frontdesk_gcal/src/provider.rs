// --- File: crates/frontdesk_gcal/src/provider.rs ---
//! The calendar capability.
//!
//! A [`CalendarProvider`] is a thin, calendar-scoped view of a remote event
//! store. It knows nothing about bookings; the slot lifecycle in
//! [`crate::logic`] is written against this trait so it runs unchanged on the
//! Google adapter and on the in-memory fake.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use frontdesk_common::BoxFuture;
use thiserror::Error;

/// Private metadata key holding the cancellation token.
pub const TOKEN_KEY: &str = "cancellation_token";
/// Private metadata key holding the client's name.
pub const CLIENT_NAME_KEY: &str = "client_name";
/// Private metadata key holding the client's email.
pub const CLIENT_EMAIL_KEY: &str = "client_email";

/// Errors that can occur when talking to the calendar provider.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("event not found")]
    NotFound,
    /// The optimistic-concurrency check failed: someone else changed the event.
    #[error("event was modified concurrently")]
    Conflict,
    #[error("calendar authentication failed: {0}")]
    Auth(String),
    #[error("calendar request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("calendar API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("unusable event: {0}")]
    InvalidEvent(String),
}

/// A timed calendar event as the booking flow sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarSlot {
    pub id: String,
    pub summary: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Provider version marker used for conditional updates.
    pub etag: Option<String>,
    pub private_properties: HashMap<String, String>,
    pub meet_link: Option<String>,
    /// The provider's full record as fetched. Updates start from it so
    /// fields the slot does not model (location, reminders, colour) survive.
    pub raw: Option<serde_json::Value>,
}

impl CalendarSlot {
    fn private(&self, key: &str) -> Option<&str> {
        self.private_properties
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn cancellation_token(&self) -> Option<&str> {
        self.private(TOKEN_KEY)
    }

    pub fn client_name(&self) -> Option<&str> {
        self.private(CLIENT_NAME_KEY)
    }

    pub fn client_email(&self) -> Option<&str> {
        self.private(CLIENT_EMAIL_KEY)
    }
}

/// What an update should do with the event's video-conference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConferenceChange {
    /// Leave whatever is there.
    Keep,
    /// Ask the provider to create a conference; `request_id` must be unique per attempt.
    Create { request_id: String },
    /// Drop the conference from the event.
    Remove,
}

pub trait CalendarProvider: Send + Sync {
    /// IANA name of the calendar's own timezone.
    fn time_zone(&self) -> BoxFuture<'_, String, CalendarError>;

    /// Timed events overlapping `[start, end)` that match the full-text
    /// `query`, ordered by start time.
    fn list_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        query: &str,
    ) -> BoxFuture<'_, Vec<CalendarSlot>, CalendarError>;

    /// Fails with [`CalendarError::NotFound`] for unknown ids.
    fn get_event(&self, event_id: &str) -> BoxFuture<'_, CalendarSlot, CalendarError>;

    /// First event whose private metadata maps `key` to `value`.
    fn find_by_private_property(
        &self,
        key: &str,
        value: &str,
    ) -> BoxFuture<'_, Option<CalendarSlot>, CalendarError>;

    /// Replaces the event with `slot`. When `if_match` is given the write
    /// only succeeds if the stored version still carries that etag, and fails
    /// with [`CalendarError::Conflict`] otherwise.
    fn update_event(
        &self,
        slot: &CalendarSlot,
        if_match: Option<&str>,
        conference: ConferenceChange,
    ) -> BoxFuture<'_, CalendarSlot, CalendarError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Stored {
        slot: CalendarSlot,
        version: u64,
    }

    fn etag(version: u64) -> String {
        format!("\"{}\"", version)
    }

    /// In-memory calendar with etag versioning.
    ///
    /// Every call yields to the scheduler once before touching state, so
    /// concurrently polled futures interleave the way remote calls would.
    pub struct InMemoryCalendar {
        time_zone: String,
        events: Mutex<BTreeMap<String, Stored>>,
        conflict_next_update: AtomicBool,
        unavailable: AtomicBool,
        updates: AtomicUsize,
    }

    impl InMemoryCalendar {
        pub fn new(time_zone: &str) -> Self {
            Self {
                time_zone: time_zone.to_string(),
                events: Mutex::new(BTreeMap::new()),
                conflict_next_update: AtomicBool::new(false),
                unavailable: AtomicBool::new(false),
                updates: AtomicUsize::new(0),
            }
        }

        /// Adds an event and returns it as stored.
        pub fn insert(
            &self,
            id: &str,
            summary: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> CalendarSlot {
            let slot = CalendarSlot {
                id: id.to_string(),
                summary: summary.to_string(),
                description: None,
                start,
                end,
                etag: Some(etag(1)),
                private_properties: HashMap::new(),
                meet_link: None,
                raw: None,
            };
            self.events.lock().unwrap().insert(
                id.to_string(),
                Stored {
                    slot: slot.clone(),
                    version: 1,
                },
            );
            slot
        }

        pub fn slot(&self, id: &str) -> Option<CalendarSlot> {
            self.events.lock().unwrap().get(id).map(|s| s.slot.clone())
        }

        /// Number of writes that were applied.
        pub fn update_count(&self) -> usize {
            self.updates.load(Ordering::SeqCst)
        }

        /// The next update fails as if another writer got there first.
        pub fn conflict_on_next_update(&self) {
            self.conflict_next_update.store(true, Ordering::SeqCst);
        }

        /// Every call fails with an API error while set.
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        async fn enter(&self) -> Result<(), CalendarError> {
            tokio::task::yield_now().await;
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(CalendarError::Api {
                    status: 503,
                    message: "backend unavailable".into(),
                });
            }
            Ok(())
        }
    }

    impl CalendarProvider for InMemoryCalendar {
        fn time_zone(&self) -> BoxFuture<'_, String, CalendarError> {
            Box::pin(async move {
                self.enter().await?;
                Ok(self.time_zone.clone())
            })
        }

        fn list_events(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
            query: &str,
        ) -> BoxFuture<'_, Vec<CalendarSlot>, CalendarError> {
            let query = query.to_lowercase();
            Box::pin(async move {
                self.enter().await?;
                let events = self.events.lock().unwrap();
                let mut slots: Vec<CalendarSlot> = events
                    .values()
                    .map(|stored| &stored.slot)
                    .filter(|slot| slot.start < end && slot.end > start)
                    .filter(|slot| {
                        let haystack = format!(
                            "{} {}",
                            slot.summary,
                            slot.description.as_deref().unwrap_or_default()
                        )
                        .to_lowercase();
                        haystack.contains(&query)
                    })
                    .cloned()
                    .collect();
                slots.sort_by_key(|slot| slot.start);
                Ok(slots)
            })
        }

        fn get_event(&self, event_id: &str) -> BoxFuture<'_, CalendarSlot, CalendarError> {
            let event_id = event_id.to_string();
            Box::pin(async move {
                self.enter().await?;
                self.slot(&event_id).ok_or(CalendarError::NotFound)
            })
        }

        fn find_by_private_property(
            &self,
            key: &str,
            value: &str,
        ) -> BoxFuture<'_, Option<CalendarSlot>, CalendarError> {
            let key = key.to_string();
            let value = value.to_string();
            Box::pin(async move {
                self.enter().await?;
                let events = self.events.lock().unwrap();
                Ok(events
                    .values()
                    .find(|stored| stored.slot.private_properties.get(&key) == Some(&value))
                    .map(|stored| stored.slot.clone()))
            })
        }

        fn update_event(
            &self,
            slot: &CalendarSlot,
            if_match: Option<&str>,
            conference: ConferenceChange,
        ) -> BoxFuture<'_, CalendarSlot, CalendarError> {
            let mut slot = slot.clone();
            let if_match = if_match.map(str::to_string);
            Box::pin(async move {
                self.enter().await?;
                if self.conflict_next_update.swap(false, Ordering::SeqCst) {
                    return Err(CalendarError::Conflict);
                }
                let mut events = self.events.lock().unwrap();
                let stored = events.get_mut(&slot.id).ok_or(CalendarError::NotFound)?;
                if let Some(expected) = &if_match {
                    if *expected != etag(stored.version) {
                        return Err(CalendarError::Conflict);
                    }
                }
                let version = stored.version + 1;
                slot.meet_link = match conference {
                    ConferenceChange::Keep => stored.slot.meet_link.clone(),
                    ConferenceChange::Create { .. } => {
                        Some(format!("https://meet.example.com/{}", slot.id))
                    }
                    ConferenceChange::Remove => None,
                };
                slot.etag = Some(etag(version));
                stored.slot = slot.clone();
                stored.version = version;
                self.updates.fetch_add(1, Ordering::SeqCst);
                Ok(slot)
            })
        }
    }
}
