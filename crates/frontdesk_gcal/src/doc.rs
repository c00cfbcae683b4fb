// File: crates/frontdesk_gcal/src/doc.rs
#![cfg(feature = "openapi")]

use utoipa::OpenApi;

use crate::logic::{AvailableSlot, BookSlotRequest, BookedEvent, CancelBookingRequest, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_availability_handler,
        crate::handlers::book_slot_handler,
        crate::handlers::cancel_booking_handler,
    ),
    components(schemas(
        AvailableSlot,
        BookSlotRequest,
        BookedEvent,
        CancelBookingRequest,
        MessageResponse,
    )),
    tags((name = "Booking", description = "Consultation slot booking"))
)]
pub struct BookingApiDoc;
