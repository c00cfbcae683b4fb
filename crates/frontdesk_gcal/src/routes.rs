// --- File: crates/frontdesk_gcal/src/routes.rs ---
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{
    book_slot_handler, cancel_booking_handler, get_availability_handler, BookingState,
};

/// Booking routes, relative to `/api`.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/booking/availability", get(get_availability_handler))
        .route("/booking/book", post(book_slot_handler))
        .route("/booking/cancel", post(cancel_booking_handler))
        .with_state(state)
}
