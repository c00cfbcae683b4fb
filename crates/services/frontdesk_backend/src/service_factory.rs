// --- File: crates/services/frontdesk_backend/src/service_factory.rs ---
//! Production adapters for every capability, chosen from configuration.
//!
//! Tests build an [`Adapters`] out of in-memory fakes instead and hand it to
//! [`crate::app_state::AppState::assemble`].

use std::sync::Arc;

use frontdesk_analytics::{ConversionTracker, Ga4Tracker};
use frontdesk_blog::{GcsObjectStore, ObjectStore};
use frontdesk_common::{
    config_error, create_client, is_analytics_enabled, is_blog_enabled, is_ideas_enabled,
    FrontdeskError, ServiceAccountTokens, TokenProvider,
};
use frontdesk_config::AppConfig;
use frontdesk_gcal::{CalendarProvider, GoogleCalendarService};
use frontdesk_ideas::{TextGenerator, VertexGenerator};
use frontdesk_mail::{MailTransport, SmtpMailer};
use tracing::info;

/// Calendar, storage and model calls give up after this many seconds.
const GOOGLE_TIMEOUT_SECS: u64 = 30;
/// Idea generation can take a while on long prompts.
const MODEL_TIMEOUT_SECS: u64 = 60;

/// One implementation per capability. Optional features are `None` when off.
pub struct Adapters {
    pub calendar: Arc<dyn CalendarProvider>,
    pub mail: Arc<dyn MailTransport>,
    pub store: Option<Arc<dyn ObjectStore>>,
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub tracker: Option<Arc<dyn ConversionTracker>>,
}

pub struct FrontdeskServiceFactory;

impl FrontdeskServiceFactory {
    /// Connects the real Google, SMTP and GA4 adapters.
    pub async fn production(config: &AppConfig) -> Result<Adapters, FrontdeskError> {
        let tokens: Arc<dyn TokenProvider> =
            Arc::new(ServiceAccountTokens::from_key_file(&config.gcp.credentials_path).await?);
        let google = create_client(GOOGLE_TIMEOUT_SECS, true)?;

        info!("ℹ️ Initializing Google Calendar service...");
        let calendar: Arc<dyn CalendarProvider> = Arc::new(GoogleCalendarService::new(
            google.clone(),
            tokens.clone(),
            &config.gcal.calendar_id,
        ));

        let mail: Arc<dyn MailTransport> = Arc::new(
            SmtpMailer::new(&config.smtp)
                .map_err(|e| config_error(format!("invalid SMTP settings: {}", e)))?,
        );
        info!("✅ SMTP transport ready for {}:{}", config.smtp.host, config.smtp.port);

        let store: Option<Arc<dyn ObjectStore>> = match config.blog.as_ref() {
            Some(blog) if is_blog_enabled(config) => {
                info!("ℹ️ Blog articles come from bucket {}", blog.bucket);
                Some(Arc::new(GcsObjectStore::new(google.clone(), tokens.clone(), &blog.bucket)))
            }
            _ => {
                info!("Blog feature is disabled");
                None
            }
        };

        let generator: Option<Arc<dyn TextGenerator>> = match config.ideas.as_ref() {
            Some(ideas) if is_ideas_enabled(config) => {
                let client = create_client(MODEL_TIMEOUT_SECS, true)?;
                info!("ℹ️ Ideas use model {} in {}", ideas.model, ideas.location);
                Some(Arc::new(VertexGenerator::new(client, tokens.clone(), ideas)))
            }
            _ => {
                info!("Ideas feature is disabled");
                None
            }
        };

        let tracker: Option<Arc<dyn ConversionTracker>> = match config.analytics.as_ref() {
            Some(analytics) if is_analytics_enabled(config) => Some(Arc::new(
                Ga4Tracker::new(analytics)
                    .map_err(|e| config_error(format!("invalid analytics settings: {}", e)))?,
            )),
            _ => {
                info!("Analytics feature is disabled");
                None
            }
        };

        Ok(Adapters {
            calendar,
            mail,
            store,
            generator,
            tracker,
        })
    }
}
