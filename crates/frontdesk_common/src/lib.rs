// --- File: crates/frontdesk_common/src/lib.rs ---

pub mod background; // Fire-and-forget task runner
pub mod error; // Error handling
pub mod features; // Runtime feature switches
pub mod gcp; // Google Cloud access tokens
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod services; // Capability trait plumbing

pub use background::BackgroundTasks;

pub use error::{
    conflict, config_error, external_service_error, internal_error, not_found, unavailable,
    validation_error, FrontdeskError, HttpStatusCode,
};

pub use http::{
    client::{create_client, error_body},
    IntoHttpResponse,
};

pub use features::{is_analytics_enabled, is_blog_enabled, is_feature_enabled, is_ideas_enabled};

pub use gcp::{ServiceAccountTokens, StaticToken, TokenProvider};

pub use services::BoxFuture;
