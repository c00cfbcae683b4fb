// File: crates/frontdesk_blog/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
};
use frontdesk_common::{not_found, unavailable, validation_error, FrontdeskError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::BlogCache;
use crate::likes::LikeStore;
use crate::parser::{Article, ArticleMeta};

pub const ARTICLE_NOT_FOUND: &str = "Article not found";

#[derive(Clone)]
pub struct BlogState {
    /// `None` when the blog feature is switched off; likes keep working.
    pub cache: Option<Arc<BlogCache>>,
    pub likes: Arc<LikeStore>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SlugLikes {
    pub slug: String,
    pub likes: u64,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LikeCount {
    pub likes: u64,
}

fn cache(state: &BlogState) -> Result<&BlogCache, FrontdeskError> {
    state
        .cache
        .as_deref()
        .ok_or_else(|| unavailable("Blog service is disabled."))
}

fn checked_slug(slug: &str) -> Result<&str, FrontdeskError> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(validation_error("Article slug is required"));
    }
    Ok(slug)
}

/// Handler listing published articles, newest first, without their content.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/articles",
    responses(
        (status = 200, description = "Published article metadata", body = [ArticleMeta]),
        (status = 503, description = "Blog disabled")
    ),
    tag = "Blog"
))]
pub async fn list_articles_handler(
    State(state): State<Arc<BlogState>>,
) -> Result<Json<Vec<ArticleMeta>>, FrontdeskError> {
    Ok(Json(cache(&state)?.all_published()))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/articles/{slug}",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Article with rendered HTML", body = Article),
        (status = 404, description = "No published article with this slug"),
        (status = 503, description = "Blog disabled")
    ),
    tag = "Blog"
))]
pub async fn get_article_handler(
    State(state): State<Arc<BlogState>>,
    Path(slug): Path<String>,
) -> Result<Json<Article>, FrontdeskError> {
    let slug = checked_slug(&slug)?;
    let article = cache(&state)?
        .by_slug(slug)
        .ok_or_else(|| not_found(ARTICLE_NOT_FOUND))?;
    Ok(Json(article.as_ref().clone()))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/articles/{slug}/likes",
    params(("slug" = String, Path, description = "Article slug")),
    responses((status = 200, description = "Current like count", body = SlugLikes)),
    tag = "Likes"
))]
pub async fn get_likes_handler(
    State(state): State<Arc<BlogState>>,
    Path(slug): Path<String>,
) -> Result<Json<SlugLikes>, FrontdeskError> {
    let slug = checked_slug(&slug)?;
    Ok(Json(SlugLikes {
        slug: slug.to_string(),
        likes: state.likes.get(slug),
    }))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/articles/{slug}/like",
    params(("slug" = String, Path, description = "Article slug")),
    responses((status = 200, description = "Like added", body = LikeCount)),
    tag = "Likes"
))]
pub async fn like_handler(
    State(state): State<Arc<BlogState>>,
    Path(slug): Path<String>,
) -> Result<Json<LikeCount>, FrontdeskError> {
    let slug = checked_slug(&slug)?;
    let likes = state.likes.increment(slug);
    info!("👍 {} now has {} likes", slug, likes);
    Ok(Json(LikeCount { likes }))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/articles/{slug}/like",
    params(("slug" = String, Path, description = "Article slug")),
    responses((status = 200, description = "Like removed; never below zero", body = LikeCount)),
    tag = "Likes"
))]
pub async fn unlike_handler(
    State(state): State<Arc<BlogState>>,
    Path(slug): Path<String>,
) -> Result<Json<LikeCount>, FrontdeskError> {
    let slug = checked_slug(&slug)?;
    let likes = state.likes.decrement(slug);
    info!("👎 {} now has {} likes", slug, likes);
    Ok(Json(LikeCount { likes }))
}
