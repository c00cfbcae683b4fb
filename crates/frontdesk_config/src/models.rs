// --- File: crates/frontdesk_config/src/models.rs ---

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Google Calendar Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    /// Loaded via CALENDAR_ID
    #[serde(default)]
    pub calendar_id: String,
    /// Title that marks an event as an open slot. Loaded via GCAL_AVAILABLE_SLOT_SUMMARY
    #[serde(default)]
    pub available_slot_summary: String,
    /// Request a video-conference link when a slot is claimed.
    #[serde(default)]
    pub conference_links: bool,
}

// --- Google Cloud Config (shared by calendar, storage and Vertex AI) ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcpConfig {
    /// Service-account key file. Loaded via GCP_CREDENTIALS_PATH
    pub credentials_path: String,
}

// --- SMTP Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SmtpConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    /// Mailbox used as sender and as SMTP login. Loaded via SEND_FROM
    #[serde(default)]
    pub send_from: String,
    /// Display name for the From header. Loaded via SEND_FROM_ALIAS
    pub send_from_alias: Option<String>,
    /// Loaded via SMTP_PASS
    #[serde(default)]
    pub password: String,
}

impl SmtpConfig {
    /// Display name used in the From header.
    pub fn sender_name(&self) -> &str {
        self.send_from_alias
            .as_deref()
            .filter(|alias| !alias.is_empty())
            .unwrap_or("Frontdesk")
    }
}

// --- Public site Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    /// Public base URL used for links in emails, e.g. the cancellation link.
    pub base_url: String,
    /// Business name shown in email copy.
    pub brand_name: String,
}

// --- Blog Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BlogConfig {
    /// Loaded via BLOG_BUCKET
    pub bucket: String,
    #[serde(default = "BlogConfig::default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "BlogConfig::default_refresh_timeout_secs")]
    pub refresh_timeout_secs: u64,
    #[serde(default = "BlogConfig::default_metadata_object")]
    pub metadata_object: String,
}

impl BlogConfig {
    fn default_refresh_interval_secs() -> u64 {
        300
    }
    fn default_refresh_timeout_secs() -> u64 {
        30
    }
    fn default_metadata_object() -> String {
        "metadata.json".to_string()
    }
}

// --- Ideas Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdeaResponseFormat {
    /// JSON array of `{title, summary}` objects.
    #[default]
    Json,
    /// One idea per line.
    Lines,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IdeasConfig {
    /// Loaded via GCP_PROJECT_ID
    #[serde(default)]
    pub project_id: String,
    /// Loaded via GCP_LOCATION
    #[serde(default)]
    pub location: String,
    #[serde(default = "IdeasConfig::default_model")]
    pub model: String,
    #[serde(default)]
    pub response_format: IdeaResponseFormat,
}

impl IdeasConfig {
    fn default_model() -> String {
        "gemini-2.5-flash".to_string()
    }
}

// --- Analytics Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnalyticsConfig {
    /// Loaded via GA_MEASUREMENT_ID
    #[serde(default)]
    pub measurement_id: String,
    /// Loaded via GA_API_SECRET
    #[serde(default)]
    pub api_secret: String,
    #[serde(default = "AnalyticsConfig::default_endpoint")]
    pub endpoint: String,
    /// Conversion value reported for a confirmed booking.
    #[serde(default = "AnalyticsConfig::default_booking_value")]
    pub booking_value: f64,
    #[serde(default = "AnalyticsConfig::default_currency")]
    pub currency: String,
}

impl AnalyticsConfig {
    fn default_endpoint() -> String {
        "https://www.google-analytics.com/mp/collect".to_string()
    }
    fn default_booking_value() -> f64 {
        250.0
    }
    fn default_currency() -> String {
        "USD".to_string()
    }
}

// --- Main App Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub gcal: GcalConfig,
    pub gcp: GcpConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    pub site: SiteConfig,

    #[serde(default = "default_true")]
    pub use_blog: bool,
    pub blog: Option<BlogConfig>,

    #[serde(default = "default_true")]
    pub use_ideas: bool,
    pub ideas: Option<IdeasConfig>,

    #[serde(default = "default_true")]
    pub use_analytics: bool,
    pub analytics: Option<AnalyticsConfig>,
}

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "********"
    }
}

impl AppConfig {
    /// One-line description of the effective configuration with secrets masked.
    pub fn redacted_summary(&self) -> String {
        format!(
            "server={}:{} calendar={} sentinel={:?} conference_links={} smtp={}:{} from={} smtp_password={} blog={} ideas={} analytics={} analytics_secret={}",
            self.server.host,
            self.server.port,
            self.gcal.calendar_id,
            self.gcal.available_slot_summary,
            self.gcal.conference_links,
            self.smtp.host,
            self.smtp.port,
            self.smtp.send_from,
            mask(&self.smtp.password),
            self.blog.as_ref().map_or("off", |b| b.bucket.as_str()),
            self.ideas.as_ref().map_or("off", |i| i.model.as_str()),
            self.analytics
                .as_ref()
                .map_or("off", |a| a.measurement_id.as_str()),
            mask(self.analytics.as_ref().map_or("", |a| a.api_secret.as_str())),
        )
    }
}
