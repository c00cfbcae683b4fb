// --- File: crates/frontdesk_blog/src/lib.rs ---
pub mod cache;
#[cfg(test)]
mod cache_test;
pub mod doc;
pub mod handlers;
pub mod likes;
pub mod parser;
pub mod routes;
pub mod store;
#[cfg(test)]
mod store_test;

pub use cache::{spawn_refresher, BlogCache, BlogRefresher};
pub use handlers::BlogState;
pub use likes::LikeStore;
pub use routes::routes;
pub use store::{GcsObjectStore, ObjectStore};
