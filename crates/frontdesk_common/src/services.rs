// --- File: crates/frontdesk_common/src/services.rs ---
//! Shared plumbing for the capability traits.
//!
//! Every external dependency (calendar, mail, object storage, text
//! generation, analytics) is reached through a trait in its feature crate with
//! one production adapter and one in-memory fake. The traits are object safe
//! and return [`BoxFuture`] so handlers can hold them as `Arc<dyn Trait>`.

use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;
