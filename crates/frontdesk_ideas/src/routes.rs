// --- File: crates/frontdesk_ideas/src/routes.rs ---
use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handlers::{email_ideas_handler, generate_ideas_handler, IdeasState};

/// Idea routes, relative to `/api`.
pub fn routes(state: Arc<IdeasState>) -> Router {
    Router::new()
        .route("/generate-ideas", post(generate_ideas_handler))
        .route("/ideas/email", post(email_ideas_handler))
        .with_state(state)
}
