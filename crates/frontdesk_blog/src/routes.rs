// --- File: crates/frontdesk_blog/src/routes.rs ---
use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers::{
    get_article_handler, get_likes_handler, like_handler, list_articles_handler, unlike_handler,
    BlogState,
};

/// Article and like routes, relative to `/api`.
pub fn routes(state: Arc<BlogState>) -> Router {
    Router::new()
        .route("/articles", get(list_articles_handler))
        .route("/articles/{slug}", get(get_article_handler))
        .route("/articles/{slug}/likes", get(get_likes_handler))
        .route(
            "/articles/{slug}/like",
            get(get_likes_handler).post(like_handler).delete(unlike_handler),
        )
        .with_state(state)
}
