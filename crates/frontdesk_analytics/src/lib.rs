// --- File: crates/frontdesk_analytics/src/lib.rs ---
pub mod tracker;

pub use tracker::{AnalyticsError, ConversionEvent, ConversionTracker, Ga4Tracker};
#[cfg(any(test, feature = "mock"))]
pub use tracker::mock;
