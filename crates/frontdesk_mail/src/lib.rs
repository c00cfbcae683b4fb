// --- File: crates/frontdesk_mail/src/lib.rs ---
pub mod doc;
pub mod handlers;
pub mod ical;
pub mod routes;
pub mod templates;
#[cfg(test)]
mod templates_test;
pub mod transport;

pub use routes::routes;
pub use templates::{BookingNotice, ContactMessage, Notifier};
pub use transport::{MailError, MailTransport, OutgoingEmail, SmtpMailer};
