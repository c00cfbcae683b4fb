// File: crates/frontdesk_ideas/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use frontdesk_common::{external_service_error, unavailable, validation_error, FrontdeskError};
use frontdesk_mail::transport::is_valid_address;
use frontdesk_mail::Notifier;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::logic::{Idea, IdeaGenerator};

pub const EMAIL_SENT: &str = "Email sent successfully";

#[derive(Clone)]
pub struct IdeasState {
    /// `None` when the ideas feature is switched off.
    pub generator: Option<Arc<IdeaGenerator>>,
    pub notifier: Arc<Notifier>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Default)]
pub struct GenerateIdeasRequest {
    #[serde(default)]
    pub topic: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug)]
pub struct IdeasResponse {
    pub ideas: Vec<Idea>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Default)]
pub struct EmailIdeasRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub ideas: Vec<Idea>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug)]
pub struct EmailSentResponse {
    pub message: String,
}

/// Handler asking the model for blog ideas on a topic.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/generate-ideas",
    request_body = GenerateIdeasRequest,
    responses(
        (status = 200, description = "Generated ideas", body = IdeasResponse),
        (status = 400, description = "Topic missing"),
        (status = 500, description = "Generation failed"),
        (status = 503, description = "Ideas feature disabled")
    ),
    tag = "Ideas"
))]
pub async fn generate_ideas_handler(
    State(state): State<Arc<IdeasState>>,
    payload: Result<Json<GenerateIdeasRequest>, JsonRejection>,
) -> Result<Json<IdeasResponse>, FrontdeskError> {
    let generator = state
        .generator
        .as_ref()
        .ok_or_else(|| unavailable("Idea generation is disabled."))?;
    let Json(request) = payload.map_err(|_| validation_error("Invalid request body"))?;

    let topic = request.topic.trim();
    if topic.is_empty() {
        return Err(validation_error("Topic cannot be empty"));
    }
    info!("Generating ideas for topic {:?}", topic);

    let ideas = generator
        .generate(topic)
        .await
        .map_err(|e| external_service_error("vertex-ai", e))?;
    Ok(Json(IdeasResponse { ideas }))
}

/// Handler mailing a set of generated ideas to the visitor.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/ideas/email",
    request_body = EmailIdeasRequest,
    responses(
        (status = 200, description = "Digest sent", body = EmailSentResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 500, description = "Mail delivery failed")
    ),
    tag = "Ideas"
))]
pub async fn email_ideas_handler(
    State(state): State<Arc<IdeasState>>,
    payload: Result<Json<EmailIdeasRequest>, JsonRejection>,
) -> Result<Json<EmailSentResponse>, FrontdeskError> {
    let Json(request) = payload.map_err(|_| validation_error("Invalid request body"))?;

    let email = request.email.trim();
    let topic = request.topic.trim();
    if email.is_empty() || topic.is_empty() || request.ideas.is_empty() {
        return Err(validation_error("Email, topic, and ideas are required"));
    }
    if !is_valid_address(email) {
        return Err(validation_error("Invalid email address"));
    }

    state
        .notifier
        .send_ideas_digest(
            email,
            topic,
            request
                .ideas
                .iter()
                .map(|idea| (idea.title.as_str(), idea.summary.as_str())),
        )
        .await
        .map_err(|e| external_service_error("smtp", format!("Failed to send email: {}", e)))?;

    info!("📨 Sent {} ideas to {}", request.ideas.len(), email);
    Ok(Json(EmailSentResponse {
        message: EMAIL_SENT.to_string(),
    }))
}
