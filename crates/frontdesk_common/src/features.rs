//! Runtime feature switches.
//!
//! Optional integrations (blog, ideas, analytics) are active only when their
//! `use_<feature>` flag is set **and** their configuration section is present.
//! Booking and mail are always on; their settings are required at startup.

use frontdesk_config::AppConfig;

/// Check if a feature is enabled at runtime based on configuration.
///
/// # Arguments
///
/// * `use_feature` - The configuration flag that enables the feature
/// * `feature_config` - The configuration section for the feature
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

pub fn is_blog_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_blog, config.blog.as_ref())
}

pub fn is_ideas_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_ideas, config.ideas.as_ref())
}

pub fn is_analytics_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_analytics, config.analytics.as_ref())
}
