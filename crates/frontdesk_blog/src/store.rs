// --- File: crates/frontdesk_blog/src/store.rs ---
//! Object storage holding the markdown sources.

use std::sync::Arc;

use frontdesk_common::gcp::STORAGE_SCOPE;
use frontdesk_common::{error_body, BoxFuture, TokenProvider};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

pub const STORAGE_API_BASE: &str = "https://storage.googleapis.com";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("object {0} not found")]
    NotFound(String),
    #[error("storage authentication failed: {0}")]
    Auth(String),
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("storage API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("invalid storage URL: {0}")]
    Url(String),
}

pub trait ObjectStore: Send + Sync {
    /// Names of the objects at the top level of the bucket.
    fn list(&self) -> BoxFuture<'_, Vec<String>, StoreError>;

    fn read(&self, name: &str) -> BoxFuture<'_, Vec<u8>, StoreError>;

    /// Creates or replaces `name`.
    fn write(
        &self,
        name: &str,
        content_type: &str,
        content: Vec<u8>,
    ) -> BoxFuture<'_, (), StoreError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectList {
    #[serde(default)]
    items: Vec<ObjectItem>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ObjectItem {
    name: String,
}

/// Google Cloud Storage over its JSON API.
pub struct GcsObjectStore {
    client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    bucket: String,
    base_url: String,
}

impl GcsObjectStore {
    pub fn new(client: reqwest::Client, tokens: Arc<dyn TokenProvider>, bucket: &str) -> Self {
        Self {
            client,
            tokens,
            bucket: bucket.to_string(),
            base_url: STORAGE_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    fn url(&self, prefix: &[&str], object: Option<&str>) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| StoreError::Url(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::Url(self.base_url.clone()))?;
            segments
                .pop_if_empty()
                .extend(prefix)
                .extend(["b", self.bucket.as_str(), "o"]);
            if let Some(object) = object {
                // Object names may contain '/', which must stay inside one segment.
                segments.push(object);
            }
        }
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, object: &str) -> Result<reqwest::Response, StoreError> {
        let token = self
            .tokens
            .access_token(&[STORAGE_SCOPE])
            .await
            .map_err(|e| StoreError::Auth(e.to_string()))?;
        let response = request.bearer_auth(token).send().await?;
        match response.status() {
            s if s.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(object.to_string())),
            status => Err(StoreError::Api {
                status: status.as_u16(),
                message: error_body(response).await,
            }),
        }
    }
}

impl ObjectStore for GcsObjectStore {
    fn list(&self) -> BoxFuture<'_, Vec<String>, StoreError> {
        Box::pin(async move {
            let url = self.url(&["storage", "v1"], None)?;
            let mut names = Vec::new();
            let mut page_token: Option<String> = None;
            loop {
                let mut request = self
                    .client
                    .get(url.clone())
                    .query(&[("delimiter", "/"), ("fields", "items(name),nextPageToken")]);
                if let Some(token) = &page_token {
                    request = request.query(&[("pageToken", token.as_str())]);
                }
                let page: ObjectList = self.send(request, &self.bucket).await?.json().await?;
                names.extend(page.items.into_iter().map(|item| item.name));
                page_token = page.next_page_token;
                if page_token.is_none() {
                    break;
                }
            }
            debug!("Bucket {} lists {} objects", self.bucket, names.len());
            Ok(names)
        })
    }

    fn read(&self, name: &str) -> BoxFuture<'_, Vec<u8>, StoreError> {
        let name = name.to_string();
        Box::pin(async move {
            let url = self.url(&["storage", "v1"], Some(&name))?;
            let request = self.client.get(url).query(&[("alt", "media")]);
            let bytes = self.send(request, &name).await?.bytes().await?;
            Ok(bytes.to_vec())
        })
    }

    fn write(
        &self,
        name: &str,
        content_type: &str,
        content: Vec<u8>,
    ) -> BoxFuture<'_, (), StoreError> {
        let name = name.to_string();
        let content_type = content_type.to_string();
        Box::pin(async move {
            let url = self.url(&["upload", "storage", "v1"], None)?;
            let request = self
                .client
                .post(url)
                .query(&[("uploadType", "media"), ("name", name.as_str())])
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(content);
            self.send(request, &name).await?;
            info!("☁️ Wrote gs://{}/{}", self.bucket, name);
            Ok(())
        })
    }
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Bucket kept in a map. Listing can be made to fail to simulate outages.
    #[derive(Default)]
    pub struct InMemoryObjectStore {
        objects: Mutex<BTreeMap<String, Vec<u8>>>,
        failing: AtomicBool,
    }

    impl InMemoryObjectStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn put(&self, name: &str, content: &str) {
            self.objects
                .lock()
                .unwrap()
                .insert(name.to_string(), content.as_bytes().to_vec());
        }

        pub fn remove(&self, name: &str) {
            self.objects.lock().unwrap().remove(name);
        }

        pub fn get(&self, name: &str) -> Option<Vec<u8>> {
            self.objects.lock().unwrap().get(name).cloned()
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    impl ObjectStore for InMemoryObjectStore {
        fn list(&self) -> BoxFuture<'_, Vec<String>, StoreError> {
            Box::pin(async move {
                if self.failing.load(Ordering::SeqCst) {
                    return Err(StoreError::Api {
                        status: 503,
                        message: "bucket unavailable".into(),
                    });
                }
                Ok(self.objects.lock().unwrap().keys().cloned().collect())
            })
        }

        fn read(&self, name: &str) -> BoxFuture<'_, Vec<u8>, StoreError> {
            let name = name.to_string();
            Box::pin(async move { self.get(&name).ok_or(StoreError::NotFound(name)) })
        }

        fn write(
            &self,
            name: &str,
            _content_type: &str,
            content: Vec<u8>,
        ) -> BoxFuture<'_, (), StoreError> {
            let name = name.to_string();
            Box::pin(async move {
                self.objects.lock().unwrap().insert(name, content);
                Ok(())
            })
        }
    }
}
