// --- File: crates/frontdesk_mail/src/routes.rs ---
use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handlers::{contact_handler, ContactState};

/// Routes for the contact form, relative to `/api`.
pub fn routes(state: Arc<ContactState>) -> Router {
    Router::new()
        .route("/contact", post(contact_handler))
        .with_state(state)
}
