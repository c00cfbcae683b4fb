//! Environment variable handling for the frontdesk application.
//!
//! Two naming schemes are understood. Structured variables follow
//! `FRONTDESK__SECTION__KEY` and are read by the `config` crate. The flat
//! deployment variables (`CALENDAR_ID`, `SMTP_HOST`, ...) are mapped onto
//! configuration paths by [`FLAT_ENV_VARS`] and take precedence.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use std::collections::HashMap;

/// The default prefix for structured configuration environment variables
pub const DEFAULT_PREFIX: &str = "FRONTDESK";

/// The separator for structured configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// A flat environment variable and the configuration path it sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatEnvVar {
    pub name: &'static str,
    pub path: &'static str,
}

const fn flat(name: &'static str, path: &'static str) -> FlatEnvVar {
    FlatEnvVar { name, path }
}

/// Flat variables understood at startup.
pub const FLAT_ENV_VARS: &[FlatEnvVar] = &[
    flat("PORT", "server.port"),
    flat("CALENDAR_ID", "gcal.calendar_id"),
    flat("GCAL_AVAILABLE_SLOT_SUMMARY", "gcal.available_slot_summary"),
    flat("GCAL_CONFERENCE_LINKS", "gcal.conference_links"),
    flat("GCP_CREDENTIALS_PATH", "gcp.credentials_path"),
    flat("SMTP_HOST", "smtp.host"),
    flat("SMTP_PORT", "smtp.port"),
    flat("SEND_FROM", "smtp.send_from"),
    flat("SEND_FROM_ALIAS", "smtp.send_from_alias"),
    flat("SMTP_PASS", "smtp.password"),
    flat("SITE_URL", "site.base_url"),
    flat("GCP_PROJECT_ID", "ideas.project_id"),
    flat("GCP_LOCATION", "ideas.location"),
    flat("GA_MEASUREMENT_ID", "analytics.measurement_id"),
    flat("GA_API_SECRET", "analytics.api_secret"),
    flat("BLOG_BUCKET", "blog.bucket"),
];

/// Get the prefix for structured configuration environment variables
pub fn config_prefix(vars: &HashMap<String, String>) -> String {
    vars.get("PREFIX")
        .cloned()
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to its structured environment variable name
///
/// # Arguments
///
/// * `path` - The configuration path (e.g., "server.host")
///
/// # Returns
///
/// The environment variable name (e.g., "FRONTDESK__SERVER__HOST")
pub fn config_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", DEFAULT_PREFIX, CONFIG_SEPARATOR, path).to_uppercase()
}

/// The flat variable that sets `path`, if there is one.
pub fn flat_env_var_for_path(path: &str) -> Option<&'static str> {
    FLAT_ENV_VARS
        .iter()
        .find(|var| var.path == path)
        .map(|var| var.name)
}

/// Human readable hint naming every variable that can set `path`.
pub fn describe_path(path: &str) -> String {
    match flat_env_var_for_path(path) {
        Some(name) => format!("{} (or {})", name, config_path_to_env_var(path)),
        None => config_path_to_env_var(path),
    }
}

/// Layers the flat variables found in `vars` over `builder`. Blank values are
/// treated as unset.
pub fn apply_flat_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    vars: &HashMap<String, String>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for var in FLAT_ENV_VARS {
        let value = vars
            .get(var.name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        builder = builder.set_override_option(var.path, value)?;
    }
    Ok(builder)
}
