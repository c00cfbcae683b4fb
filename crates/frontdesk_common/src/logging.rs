//! Log setup for the frontdesk binary.
//!
//! Every crate logs through `tracing`. The backend calls [`init`] once before
//! loading configuration so config errors are logged too.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Targets that log at the chosen level when `RUST_LOG` is unset.
const DEFAULT_TARGETS: &[&str] = &[
    "frontdesk_backend",
    "frontdesk_common",
    "frontdesk_gcal",
    "frontdesk_mail",
    "frontdesk_blog",
    "frontdesk_ideas",
    "frontdesk_analytics",
    "tower_http",
];

/// Filter directives enabling `level` for the frontdesk crates and request
/// tracing, with everything else at `warn`.
pub fn default_directives(level: Level) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(DEFAULT_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

/// Installs the subscriber at INFO. `RUST_LOG` takes precedence when set.
///
/// ```
/// frontdesk_common::logging::init();
/// frontdesk_common::logging::init(); // second call is a no-op
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

pub fn init_with_level(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    // A global subscriber may already exist in tests.
    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("📝 Logging initialized at level {}", level);
    }
}
