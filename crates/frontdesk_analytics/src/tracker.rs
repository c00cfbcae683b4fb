// --- File: crates/frontdesk_analytics/src/tracker.rs ---
//! Conversion tracking over the GA4 Measurement Protocol.

use frontdesk_common::{create_client, error_body, BoxFuture};
use frontdesk_config::AnalyticsConfig;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Measurement Protocol requests are abandoned after this many seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

pub const BOOKING_CONFIRMED_EVENT: &str = "booking_confirmed";

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("analytics request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("analytics endpoint answered {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// A confirmed booking as reported to analytics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversionEvent {
    /// Browser client id taken from the `_ga` cookie by the frontend.
    pub client_id: Option<String>,
    pub session_id: Option<String>,
    /// Identifies the booking; the booked calendar event id.
    pub transaction_id: String,
}

pub trait ConversionTracker: Send + Sync {
    /// Reports a confirmed booking. Implementations may skip events they
    /// cannot attribute; that is not an error.
    fn track_booking_confirmed(&self, event: ConversionEvent) -> BoxFuture<'_, (), AnalyticsError>;
}

#[derive(Serialize)]
struct MeasurementPayload<'a> {
    client_id: &'a str,
    events: [MeasurementEvent<'a>; 1],
}

#[derive(Serialize)]
struct MeasurementEvent<'a> {
    name: &'static str,
    params: BookingParams<'a>,
}

#[derive(Serialize)]
struct BookingParams<'a> {
    currency: &'a str,
    value: f64,
    transaction_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
    // GA4 drops events without engagement time from realtime reports.
    engagement_time_msec: &'static str,
}

/// Production tracker posting to the Measurement Protocol collect endpoint.
pub struct Ga4Tracker {
    client: reqwest::Client,
    endpoint: String,
    measurement_id: String,
    api_secret: String,
    booking_value: f64,
    currency: String,
}

impl Ga4Tracker {
    pub fn new(config: &AnalyticsConfig) -> Result<Self, AnalyticsError> {
        let client = create_client(REQUEST_TIMEOUT_SECS, true)?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            measurement_id: config.measurement_id.clone(),
            api_secret: config.api_secret.clone(),
            booking_value: config.booking_value,
            currency: config.currency.clone(),
        })
    }
}

impl ConversionTracker for Ga4Tracker {
    fn track_booking_confirmed(&self, event: ConversionEvent) -> BoxFuture<'_, (), AnalyticsError> {
        Box::pin(async move {
            let Some(client_id) = event.client_id.as_deref().filter(|id| !id.is_empty()) else {
                warn!(
                    "No GA client id for booking {}, skipping conversion event",
                    event.transaction_id
                );
                return Ok(());
            };

            let payload = MeasurementPayload {
                client_id,
                events: [MeasurementEvent {
                    name: BOOKING_CONFIRMED_EVENT,
                    params: BookingParams {
                        currency: &self.currency,
                        value: self.booking_value,
                        transaction_id: &event.transaction_id,
                        session_id: event.session_id.as_deref().filter(|id| !id.is_empty()),
                        engagement_time_msec: "1",
                    },
                }],
            };

            let response = self
                .client
                .post(&self.endpoint)
                .query(&[
                    ("api_secret", self.api_secret.as_str()),
                    ("measurement_id", self.measurement_id.as_str()),
                ])
                .json(&payload)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(AnalyticsError::Rejected {
                    status: status.as_u16(),
                    body: error_body(response).await,
                });
            }

            info!(
                "📈 Sent {} event for transaction {}",
                BOOKING_CONFIRMED_EVENT, event.transaction_id
            );
            Ok(())
        })
    }
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Records every event instead of sending it.
    #[derive(Default)]
    pub struct RecordingTracker {
        events: Mutex<Vec<ConversionEvent>>,
    }

    impl RecordingTracker {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<ConversionEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ConversionTracker for RecordingTracker {
        fn track_booking_confirmed(
            &self,
            event: ConversionEvent,
        ) -> BoxFuture<'_, (), AnalyticsError> {
            Box::pin(async move {
                self.events.lock().unwrap().push(event);
                Ok(())
            })
        }
    }
}
