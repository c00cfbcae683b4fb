// File: crates/frontdesk_mail/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use frontdesk_common::{external_service_error, validation_error, FrontdeskError};
use serde::Deserialize;
use tracing::info;

use crate::templates::{ContactMessage, Notifier};
use crate::transport::is_valid_address;

#[derive(Clone)]
pub struct ContactState {
    pub notifier: Arc<Notifier>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub send_copy_to_self: bool,
}

pub const CONTACT_SENT: &str = "Message sent successfully";

/// Handler for the contact form. The mail is sent before responding so the
/// visitor learns whether it went out.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message delivered", body = String),
        (status = 400, description = "Missing or invalid fields"),
        (status = 500, description = "Mail delivery failed")
    ),
    tag = "Contact"
))]
pub async fn contact_handler(
    State(state): State<Arc<ContactState>>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<(StatusCode, &'static str), FrontdeskError> {
    let Json(request) = payload.map_err(|_| validation_error("Invalid request body"))?;

    let name = request.name.trim();
    let email = request.email.trim();
    let message = request.message.trim();
    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(validation_error("Name, email, and message are required"));
    }
    if !is_valid_address(email) {
        return Err(validation_error("Invalid email address"));
    }

    let contact = ContactMessage {
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
        send_copy_to_self: request.send_copy_to_self,
    };
    state
        .notifier
        .send_contact_message(&contact)
        .await
        .map_err(|e| external_service_error("smtp", format!("Failed to send message: {}", e)))?;

    info!("📨 Contact message from {} delivered", contact.email);
    Ok((StatusCode::OK, CONTACT_SENT))
}
