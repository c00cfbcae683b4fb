// --- File: crates/frontdesk_gcal/src/lib.rs ---
pub mod doc;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod provider;
pub mod routes;
pub mod service;

pub use handlers::BookingState;
pub use logic::{BookingError, ClientDetails, SlotBook};
pub use provider::{CalendarError, CalendarProvider, CalendarSlot};
pub use routes::routes;
pub use service::GoogleCalendarService;
