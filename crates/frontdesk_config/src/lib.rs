// --- File: crates/frontdesk_config/src/lib.rs ---
use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::env;
use std::path::Path;

pub mod env_vars;
pub mod models;

pub use models::*;

use env_vars::describe_path;

/// Loads the configuration from `.env`, optional files under `CONFIG_DIR`
/// (default `config/`) and the process environment, then validates it.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    let vars: HashMap<String, String> = env::vars().collect();
    let config_dir = vars
        .get("CONFIG_DIR")
        .cloned()
        .unwrap_or_else(|| "config".to_string());
    load_config_from(&vars, Path::new(&config_dir))
}

/// Same as [`load_config`] but reads variables from `vars` instead of the
/// process environment.
pub fn load_config_from(
    vars: &HashMap<String, String>,
    config_dir: &Path,
) -> Result<AppConfig, ConfigError> {
    let run_env = vars
        .get("RUN_ENV")
        .cloned()
        .unwrap_or_else(|| "debug".to_string());
    let prefix = env_vars::config_prefix(vars);

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    let env_source: config::Map<String, String> = vars
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("gcp.credentials_path", "gcp-credentials.json")?
        .set_default("site.base_url", "http://localhost:8080")?
        .set_default("site.brand_name", "Frontdesk")?
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true)
                .source(Some(env_source)),
        );
    let builder = env_vars::apply_flat_overrides(builder, vars)?;

    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

impl AppConfig {
    /// Checks that every required setting is present. All problems are
    /// reported together so a misconfigured deployment can be fixed in one go.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing: Vec<String> = Vec::new();
        let mut require = |present: bool, path: &str| {
            if !present {
                missing.push(describe_path(path));
            }
        };

        require(!self.gcal.calendar_id.is_empty(), "gcal.calendar_id");
        require(
            !self.gcal.available_slot_summary.is_empty(),
            "gcal.available_slot_summary",
        );
        require(!self.smtp.host.is_empty(), "smtp.host");
        require(self.smtp.port != 0, "smtp.port");
        require(!self.smtp.send_from.is_empty(), "smtp.send_from");
        require(!self.smtp.password.is_empty(), "smtp.password");

        if let Some(ideas) = self.ideas.as_ref().filter(|_| self.use_ideas) {
            require(!ideas.project_id.is_empty(), "ideas.project_id");
            require(!ideas.location.is_empty(), "ideas.location");
        }
        if let Some(analytics) = self.analytics.as_ref().filter(|_| self.use_analytics) {
            require(
                !analytics.measurement_id.is_empty(),
                "analytics.measurement_id",
            );
            require(!analytics.api_secret.is_empty(), "analytics.api_secret");
        }
        if let Some(blog) = self.blog.as_ref().filter(|_| self.use_blog) {
            require(!blog.bucket.is_empty(), "blog.bucket");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(format!(
                "missing required configuration: {}",
                missing.join(", ")
            )))
        }
    }
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file named by `DOTENV_OVERRIDE` wins, then a first command line
/// argument starting with `.env`, then `.env`. Loading happens at most once
/// per process; a missing file is not an error. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        if dotenv::from_filename(&dotenv_path).is_ok() {
            tracing::debug!("Loaded environment from {}", dotenv_path);
        }
    });

    dotenv_path
}
