// --- File: crates/frontdesk_ideas/src/lib.rs ---
pub mod doc;
pub mod generator;
pub mod handlers;
pub mod logic;
pub mod routes;

pub use generator::{TextGenerator, VertexGenerator};
pub use handlers::IdeasState;
pub use logic::{Idea, IdeaGenerator};
pub use routes::routes;
