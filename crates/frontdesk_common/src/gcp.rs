// --- File: crates/frontdesk_common/src/gcp.rs ---
//! Google Cloud access tokens.
//!
//! Calendar, Cloud Storage and Vertex AI all authenticate with the same
//! service-account key. Adapters ask a [`TokenProvider`] for a bearer token
//! per request; `yup-oauth2` caches and refreshes tokens internally.

use tracing::info;
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator};

use crate::error::FrontdeskError;
use crate::services::BoxFuture;

pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
pub const STORAGE_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_write";
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Source of OAuth2 bearer tokens.
pub trait TokenProvider: Send + Sync {
    fn access_token<'a>(&'a self, scopes: &'a [&'a str]) -> BoxFuture<'a, String, FrontdeskError>;
}

/// Tokens minted from a service-account key file.
pub struct ServiceAccountTokens {
    authenticator: DefaultAuthenticator,
}

impl ServiceAccountTokens {
    pub async fn from_key_file(path: &str) -> Result<Self, FrontdeskError> {
        let key = read_service_account_key(path).await.map_err(|e| {
            FrontdeskError::ConfigError(format!(
                "failed to read service account key from {}: {}",
                path, e
            ))
        })?;
        let authenticator = ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|e| {
                FrontdeskError::AuthError(format!("failed to build authenticator: {}", e))
            })?;
        info!("✅ Service account credentials loaded from {}", path);
        Ok(Self { authenticator })
    }
}

impl TokenProvider for ServiceAccountTokens {
    fn access_token<'a>(&'a self, scopes: &'a [&'a str]) -> BoxFuture<'a, String, FrontdeskError> {
        Box::pin(async move {
            let token = self
                .authenticator
                .token(scopes)
                .await
                .map_err(|e| FrontdeskError::AuthError(e.to_string()))?;
            token
                .token()
                .map(str::to_string)
                .ok_or_else(|| FrontdeskError::AuthError("token response had no access token".into()))
        })
    }
}

/// A fixed token, for tests and local emulators.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn access_token<'a>(&'a self, _scopes: &'a [&'a str]) -> BoxFuture<'a, String, FrontdeskError> {
        Box::pin(async move { Ok(self.0.clone()) })
    }
}
