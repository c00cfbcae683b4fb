// File: crates/frontdesk_blog/src/doc.rs
#![cfg(feature = "openapi")]

use utoipa::OpenApi;

use crate::handlers::{LikeCount, SlugLikes};
use crate::parser::{Article, ArticleMeta};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::list_articles_handler,
        crate::handlers::get_article_handler,
        crate::handlers::get_likes_handler,
        crate::handlers::like_handler,
        crate::handlers::unlike_handler,
    ),
    components(schemas(Article, ArticleMeta, SlugLikes, LikeCount)),
    tags(
        (name = "Blog", description = "Published markdown articles"),
        (name = "Likes", description = "In-memory like counters")
    )
)]
pub struct BlogApiDoc;
