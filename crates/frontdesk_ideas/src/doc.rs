// File: crates/frontdesk_ideas/src/doc.rs
#![cfg(feature = "openapi")]

use utoipa::OpenApi;

use crate::handlers::{EmailIdeasRequest, EmailSentResponse, GenerateIdeasRequest, IdeasResponse};
use crate::logic::Idea;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::generate_ideas_handler,
        crate::handlers::email_ideas_handler,
    ),
    components(schemas(Idea, GenerateIdeasRequest, IdeasResponse, EmailIdeasRequest, EmailSentResponse)),
    tags((name = "Ideas", description = "AI-assisted blog topic ideas"))
)]
pub struct IdeasApiDoc;
