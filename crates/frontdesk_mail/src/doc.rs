// File: crates/frontdesk_mail/src/doc.rs
#![cfg(feature = "openapi")]

use utoipa::OpenApi;

use crate::handlers::ContactRequest;

#[derive(OpenApi)]
#[openapi(
    paths(crate::handlers::contact_handler),
    components(schemas(ContactRequest)),
    tags((name = "Contact", description = "Contact form delivery"))
)]
pub struct ContactApiDoc;
