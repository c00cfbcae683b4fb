// --- File: crates/services/frontdesk_backend/src/app_state.rs ---
use std::sync::Arc;
use std::time::Duration;

use frontdesk_blog::{spawn_refresher, BlogCache, BlogRefresher, BlogState, LikeStore};
use frontdesk_common::BackgroundTasks;
use frontdesk_config::AppConfig;
use frontdesk_gcal::{BookingState, SlotBook};
use frontdesk_ideas::{IdeaGenerator, IdeasState};
use frontdesk_mail::handlers::ContactState;
use frontdesk_mail::Notifier;
use tracing::{info, warn};

use crate::service_factory::Adapters;

/// Per-feature handler state, built once at startup and shared by all routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub booking: Arc<BookingState>,
    pub contact: Arc<ContactState>,
    pub blog: Arc<BlogState>,
    pub ideas: Arc<IdeasState>,
}

impl AppState {
    /// Wires `adapters` into handler state. Loads the blog once and starts
    /// its refresher when the blog is on; the caller owns the refresher and
    /// stops it on shutdown.
    pub async fn assemble(
        config: Arc<AppConfig>,
        adapters: Adapters,
    ) -> (Self, Option<BlogRefresher>) {
        let tasks = BackgroundTasks::default();
        let notifier = Arc::new(Notifier::new(adapters.mail, &config.smtp, &config.site));

        let book = SlotBook::connect(
            adapters.calendar,
            &config.gcal.available_slot_summary,
            config.gcal.conference_links,
        )
        .await;
        let booking = Arc::new(BookingState {
            book: Arc::new(book),
            notifier: notifier.clone(),
            tracker: adapters.tracker,
            tasks,
        });

        let (cache, refresher) = match (adapters.store, config.blog.as_ref()) {
            (Some(store), Some(blog_config)) => {
                let cache = Arc::new(BlogCache::new(store, blog_config));
                match cache.refresh().await {
                    Ok(count) => info!("✅ Blog loaded with {} articles", count),
                    Err(e) => warn!("Initial blog load failed, serving no articles until the next refresh: {}", e),
                }
                let interval = Duration::from_secs(blog_config.refresh_interval_secs.max(1));
                let refresher = spawn_refresher(cache.clone(), interval);
                (Some(cache), Some(refresher))
            }
            _ => (None, None),
        };
        let blog = Arc::new(BlogState {
            cache,
            likes: Arc::new(LikeStore::new()),
        });

        let format = config.ideas.as_ref().map(|ideas| ideas.response_format).unwrap_or_default();
        let ideas = Arc::new(IdeasState {
            generator: adapters
                .generator
                .map(|generator| Arc::new(IdeaGenerator::new(generator, format))),
            notifier: notifier.clone(),
        });

        let contact = Arc::new(ContactState { notifier });

        (
            Self {
                config,
                booking,
                contact,
                blog,
                ideas,
            },
            refresher,
        )
    }
}
