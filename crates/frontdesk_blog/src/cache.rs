// --- File: crates/frontdesk_blog/src/cache.rs ---
//! In-memory snapshot of the published articles.
//!
//! Readers clone an `Arc` to the current snapshot under a read lock and never
//! wait on a refresh. A refresh builds the next snapshot off to the side and
//! swaps it in under a short write lock. A failed refresh keeps the old one.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use frontdesk_config::BlogConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::parser::{parse_article, Article, ArticleMeta};
use crate::store::{ObjectStore, StoreError};

const MARKDOWN_SUFFIX: &str = ".md";

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("listing articles failed: {0}")]
    List(#[from] StoreError),
    #[error("refresh timed out after {0:?}")]
    Timeout(Duration),
}

/// Body of the derived metadata document written back to the bucket.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MetadataDocument {
    pub generated_at: DateTime<Utc>,
    pub articles: Vec<ArticleMeta>,
}

#[derive(Default)]
struct Snapshot {
    articles: HashMap<String, Arc<Article>>,
    /// Published only, newest first.
    listing: Vec<ArticleMeta>,
}

pub struct BlogCache {
    store: Arc<dyn ObjectStore>,
    metadata_object: String,
    refresh_timeout: Duration,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl BlogCache {
    /// An empty cache; nothing is served until the first [`refresh`](Self::refresh).
    pub fn new(store: Arc<dyn ObjectStore>, config: &BlogConfig) -> Self {
        Self {
            store,
            metadata_object: config.metadata_object.clone(),
            refresh_timeout: Duration::from_secs(config.refresh_timeout_secs.max(1)),
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
        }
    }

    fn current(&self) -> Arc<Snapshot> {
        match self.snapshot.read() {
            Ok(guard) => guard.clone(),
            // A panicking writer cannot leave a half-built snapshot behind.
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Metadata of every published article, newest first.
    pub fn all_published(&self) -> Vec<ArticleMeta> {
        self.current().listing.clone()
    }

    pub fn by_slug(&self, slug: &str) -> Option<Arc<Article>> {
        self.current().articles.get(slug).cloned()
    }

    pub fn len(&self) -> usize {
        self.current().listing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reloads every article, bounded by the configured timeout. Returns the
    /// number of published articles now served.
    pub async fn refresh(&self) -> Result<usize, RefreshError> {
        tokio::time::timeout(self.refresh_timeout, self.reload())
            .await
            .map_err(|_| RefreshError::Timeout(self.refresh_timeout))?
    }

    async fn reload(&self) -> Result<usize, RefreshError> {
        let names = self.store.list().await?;

        let mut articles = HashMap::new();
        let mut listing = Vec::new();
        for name in names {
            let Some(slug) = name.strip_suffix(MARKDOWN_SUFFIX) else {
                continue;
            };
            if slug.is_empty() {
                continue;
            }
            let source = match self.store.read(&name).await {
                Ok(source) => source,
                Err(e) => {
                    error!("Failed to read article {}: {}", name, e);
                    continue;
                }
            };
            let article = match parse_article(&source, slug) {
                Ok(article) => article,
                Err(e) => {
                    warn!("Skipping article {}: {}", name, e);
                    continue;
                }
            };
            if !article.meta.published {
                debug!("Skipping unpublished article {}", slug);
                continue;
            }
            listing.push(article.meta.clone());
            articles.insert(slug.to_string(), Arc::new(article));
        }
        listing.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

        let count = listing.len();
        let next = Arc::new(Snapshot { articles, listing });
        match self.snapshot.write() {
            Ok(mut guard) => *guard = next.clone(),
            Err(poisoned) => *poisoned.into_inner() = next.clone(),
        }
        info!("📰 Blog cache refreshed with {} articles", count);

        self.write_metadata(&next.listing).await;
        Ok(count)
    }

    async fn write_metadata(&self, listing: &[ArticleMeta]) {
        let document = MetadataDocument {
            generated_at: Utc::now(),
            articles: listing.to_vec(),
        };
        let body = match serde_json::to_vec(&document) {
            Ok(body) => body,
            Err(e) => {
                warn!("Could not encode {}: {}", self.metadata_object, e);
                return;
            }
        };
        if let Err(e) = self
            .store
            .write(&self.metadata_object, "application/json", body)
            .await
        {
            warn!("Could not write {}: {}", self.metadata_object, e);
        }
    }
}

/// Handle to the periodic refresh loop.
pub struct BlogRefresher {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl BlogRefresher {
    /// Ends the loop and waits for an in-flight refresh to finish.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.handle.await {
            error!("🚨 Blog refresher ended abnormally: {}", e);
        }
    }
}

/// Refreshes `cache` every `interval` until stopped. The first refresh runs
/// one interval after spawning; load once up front when that matters.
pub fn spawn_refresher(cache: Arc<BlogCache>, interval: Duration) -> BlogRefresher {
    let (stop, mut stopped) = watch::channel(false);
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // interval() fires immediately; skip that tick.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = cache.refresh().await {
                        error!("🚨 Background blog refresh failed: {}", e);
                    }
                }
                changed = stopped.changed() => {
                    if changed.is_err() || *stopped.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Blog refresher stopped");
    });
    BlogRefresher { stop, handle }
}
