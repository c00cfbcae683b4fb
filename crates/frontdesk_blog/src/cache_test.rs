use std::sync::Arc;
use std::time::Duration;

use frontdesk_common::BoxFuture;
use frontdesk_config::BlogConfig;

use crate::cache::{spawn_refresher, BlogCache, MetadataDocument, RefreshError};
use crate::store::mock::InMemoryObjectStore;
use crate::store::{ObjectStore, StoreError};

fn config() -> BlogConfig {
    BlogConfig {
        bucket: "blog-bucket".to_string(),
        refresh_interval_secs: 300,
        refresh_timeout_secs: 30,
        metadata_object: "metadata.json".to_string(),
    }
}

fn post(title: &str, date: &str, published: bool) -> String {
    format!(
        "---\ntitle: {}\nsummary: About {}\ndate: {}\npublished: {}\n---\nBody of {}\n",
        title, title, date, published, title
    )
}

fn seeded_store() -> Arc<InMemoryObjectStore> {
    let store = Arc::new(InMemoryObjectStore::new());
    store.put("older.md", &post("Older", "2025-01-10", true));
    store.put("newer.md", &post("Newer", "2025-06-01", true));
    store.put("draft.md", &post("Draft", "2025-07-01", false));
    store.put("broken.md", "no front matter here");
    store.put("notes.txt", "not an article");
    store
}

#[tokio::test]
async fn test_refresh_serves_published_newest_first() {
    let store = seeded_store();
    let cache = BlogCache::new(store.clone(), &config());
    assert!(cache.is_empty());

    assert_eq!(cache.refresh().await.unwrap(), 2);

    let slugs: Vec<String> = cache.all_published().into_iter().map(|m| m.slug).collect();
    assert_eq!(slugs, vec!["newer", "older"]);
    assert!(cache.by_slug("draft").is_none());
    assert!(cache.by_slug("broken").is_none());
    let newer = cache.by_slug("newer").unwrap();
    assert_eq!(newer.meta.title, "Newer");
    assert!(newer.content.contains("<p>Body of Newer</p>"));
}

#[tokio::test]
async fn test_refresh_writes_metadata_document() {
    let store = seeded_store();
    let cache = BlogCache::new(store.clone(), &config());
    cache.refresh().await.unwrap();

    let raw = store.get("metadata.json").expect("metadata.json written");
    let document: MetadataDocument = serde_json::from_slice(&raw).unwrap();
    let slugs: Vec<&str> = document.articles.iter().map(|m| m.slug.as_str()).collect();
    assert_eq!(slugs, vec!["newer", "older"]);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_snapshot() {
    let store = seeded_store();
    let cache = BlogCache::new(store.clone(), &config());
    cache.refresh().await.unwrap();

    store.set_failing(true);
    assert!(matches!(cache.refresh().await, Err(RefreshError::List(_))));
    assert_eq!(cache.len(), 2);
    assert!(cache.by_slug("older").is_some());
}

#[tokio::test]
async fn test_unpublishing_removes_article() {
    let store = seeded_store();
    let cache = BlogCache::new(store.clone(), &config());
    cache.refresh().await.unwrap();

    store.put("older.md", &post("Older", "2025-01-10", false));
    store.remove("newer.md");
    assert_eq!(cache.refresh().await.unwrap(), 0);
    assert!(cache.all_published().is_empty());
    assert!(cache.by_slug("older").is_none());
}

struct StalledStore;

impl ObjectStore for StalledStore {
    fn list(&self) -> BoxFuture<'_, Vec<String>, StoreError> {
        Box::pin(async {
            tokio::time::sleep(Duration::from_secs(120)).await;
            Ok(Vec::new())
        })
    }

    fn read(&self, name: &str) -> BoxFuture<'_, Vec<u8>, StoreError> {
        let name = name.to_string();
        Box::pin(async move { Err(StoreError::NotFound(name)) })
    }

    fn write(&self, _name: &str, _content_type: &str, _content: Vec<u8>) -> BoxFuture<'_, (), StoreError> {
        Box::pin(async { Ok(()) })
    }
}

#[tokio::test(start_paused = true)]
async fn test_refresh_times_out() {
    let cache = BlogCache::new(Arc::new(StalledStore), &config());
    match cache.refresh().await {
        Err(RefreshError::Timeout(limit)) => assert_eq!(limit, Duration::from_secs(30)),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_refresher_picks_up_changes_and_stops() {
    let store = seeded_store();
    let cache = Arc::new(BlogCache::new(store.clone(), &config()));
    cache.refresh().await.unwrap();

    let refresher = spawn_refresher(cache.clone(), Duration::from_secs(300));
    store.put("latest.md", &post("Latest", "2025-09-01", true));

    tokio::time::sleep(Duration::from_secs(100)).await;
    assert!(cache.by_slug("latest").is_none());

    tokio::time::sleep(Duration::from_secs(201)).await;
    assert_eq!(cache.all_published()[0].slug, "latest");

    refresher.stop().await;
}
