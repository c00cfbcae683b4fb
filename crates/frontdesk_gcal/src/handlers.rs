// File: crates/frontdesk_gcal/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use frontdesk_analytics::{ConversionEvent, ConversionTracker};
use frontdesk_common::{
    conflict, external_service_error, not_found, validation_error, BackgroundTasks, FrontdeskError,
};
use frontdesk_mail::transport::is_valid_address;
use frontdesk_mail::{BookingNotice, Notifier};
use tracing::{error, info};

use crate::logic::{
    AvailabilityQuery, AvailableSlot, BookSlotRequest, BookedEvent, BookingError,
    CancelBookingRequest, ClientDetails, MessageResponse, SlotBook,
};
use crate::provider::CalendarSlot;

pub const SLOT_TAKEN: &str = "This time slot is no longer available. Please select another time.";
pub const BOOKING_NOT_FOUND: &str = "Booking not found. The link may be invalid or expired.";
pub const BOOKING_CANCELLED: &str = "Booking cancelled successfully";

// Shared state for the booking handlers
#[derive(Clone)]
pub struct BookingState {
    pub book: Arc<SlotBook>,
    pub notifier: Arc<Notifier>,
    /// `None` when analytics is switched off.
    pub tracker: Option<Arc<dyn ConversionTracker>>,
    pub tasks: BackgroundTasks,
}

fn calendar_failure(err: BookingError) -> FrontdeskError {
    external_service_error("calendar", err)
}

fn notice_for(state: &BookingState, slot: &CalendarSlot, client: &ClientDetails) -> BookingNotice {
    BookingNotice {
        event_id: slot.id.clone(),
        client_name: client.name.clone(),
        client_email: client.email.clone(),
        notes: client.notes.clone(),
        start: slot.start,
        end: slot.end,
        time_zone: state.book.time_zone(),
        meet_link: slot.meet_link.clone(),
        cancellation_token: slot.cancellation_token().map(str::to_string),
    }
}

/// Handler listing the open slots of one day.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/booking/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Open slots, ordered and non-overlapping", body = [AvailableSlot]),
        (status = 400, description = "Missing or malformed date"),
        (status = 500, description = "Calendar error")
    ),
    tag = "Booking"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<AvailableSlot>>, FrontdeskError> {
    let raw = query
        .date
        .as_deref()
        .map(str::trim)
        .filter(|date| !date.is_empty())
        .ok_or_else(|| validation_error("date query parameter is required"))?;
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| validation_error("invalid date format, use YYYY-MM-DD"))?;

    let slots = state
        .book
        .list_availability(day)
        .await
        .map_err(calendar_failure)?;
    info!("Found {} open slots on {}", slots.len(), day);

    Ok(Json(slots.iter().map(AvailableSlot::from).collect()))
}

/// Handler claiming an open slot. Notifications and analytics run after the
/// response in the background.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/book",
    request_body = BookSlotRequest,
    responses(
        (status = 201, description = "Slot booked", body = BookedEvent),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Slot no longer available"),
        (status = 500, description = "Calendar error")
    ),
    tag = "Booking"
))]
pub async fn book_slot_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<BookSlotRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookedEvent>), FrontdeskError> {
    let Json(request) = payload.map_err(|_| validation_error("Invalid request body"))?;

    let event_id = request.event_id.trim();
    let client = ClientDetails {
        name: request.name.trim().to_string(),
        email: request.email.trim().to_string(),
        notes: request.notes.trim().to_string(),
    };
    if event_id.is_empty() || client.name.is_empty() || client.email.is_empty() {
        return Err(validation_error(
            "Bad Request: Name, email, and eventId are required",
        ));
    }
    if !is_valid_address(&client.email) {
        return Err(validation_error("Invalid email address"));
    }

    let booked = match state.book.claim(event_id, &client).await {
        Ok(slot) => slot,
        Err(BookingError::SlotNotFound) => {
            info!("Slot {} could not be claimed", event_id);
            return Err(conflict(SLOT_TAKEN));
        }
        Err(e) => return Err(calendar_failure(e)),
    };

    if let Some(tracker) = state.tracker.clone() {
        let event = ConversionEvent {
            client_id: request.ga_client_id.clone(),
            session_id: request.ga_session_id.clone(),
            transaction_id: booked.id.clone(),
        };
        state.tasks.spawn("booking conversion", async move {
            tracker.track_booking_confirmed(event).await
        });
    }

    let notice = notice_for(&state, &booked, &client);
    if notice.cancellation_token.is_none() {
        error!("🚨 Booked slot {} came back without a cancellation token", booked.id);
    }
    let notifier = state.notifier.clone();
    let client_notice = notice.clone();
    state.tasks.spawn("booking confirmation email", async move {
        notifier.send_booking_confirmation(&client_notice).await
    });
    let notifier = state.notifier.clone();
    state.tasks.spawn("booking admin email", async move {
        notifier.send_booking_admin_notice(&notice).await
    });

    Ok((StatusCode::CREATED, Json(BookedEvent::from(&booked))))
}

/// Handler releasing a booking by its cancellation token.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/cancel",
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "Booking cancelled", body = MessageResponse),
        (status = 400, description = "Token missing"),
        (status = 404, description = "No booking holds this token"),
        (status = 500, description = "Calendar error")
    ),
    tag = "Booking"
))]
pub async fn cancel_booking_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<CancelBookingRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, FrontdeskError> {
    let Json(request) = payload.map_err(|_| validation_error("Invalid request body"))?;

    let released = match state.book.release(&request.token).await {
        Ok(slot) => slot,
        Err(BookingError::MissingToken) => {
            return Err(validation_error("Cancellation token is required"))
        }
        Err(BookingError::SlotNotFound) => return Err(not_found(BOOKING_NOT_FOUND)),
        Err(e) => return Err(calendar_failure(e)),
    };

    match (released.client_name(), released.client_email()) {
        (Some(name), Some(email)) => {
            let client = ClientDetails {
                name: name.to_string(),
                email: email.to_string(),
                notes: String::new(),
            };
            let notice = notice_for(&state, &released, &client);
            let notifier = state.notifier.clone();
            let client_notice = notice.clone();
            state.tasks.spawn("cancellation email", async move {
                notifier.send_cancellation_confirmation(&client_notice).await
            });
            let notifier = state.notifier.clone();
            state.tasks.spawn("cancellation admin email", async move {
                notifier.send_cancellation_admin_notice(&notice).await
            });
        }
        _ => info!(
            "Released slot {} had no client details, skipping notifications",
            released.id
        ),
    }

    Ok(Json(MessageResponse {
        message: BOOKING_CANCELLED.to_string(),
    }))
}
