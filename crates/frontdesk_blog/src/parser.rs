// --- File: crates/frontdesk_blog/src/parser.rs ---
//! Markdown articles with a YAML front matter block.

use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const FENCE: &str = "---";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("article is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("article has no front matter")]
    MissingFrontMatter,
    #[error("front matter is not terminated")]
    UnterminatedFrontMatter,
    #[error("invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
}

/// Article metadata; everything except the rendered body.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ArticleMeta {
    /// File name without `.md`.
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    /// Publish date as written, normally `YYYY-MM-DD`. Sorting compares it as text.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub published: bool,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Article {
    #[serde(flatten)]
    pub meta: ArticleMeta,
    /// Rendered HTML.
    pub content: String,
}

#[derive(Deserialize)]
struct FrontMatter {
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    date: Option<serde_yaml::Value>,
    #[serde(default)]
    published: bool,
}

/// YAML may read an unquoted date as a string or a number; keep what was written.
fn date_text(value: Option<serde_yaml::Value>) -> String {
    match value {
        Some(serde_yaml::Value::String(date)) => date,
        Some(serde_yaml::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Splits `source` into its front matter and markdown body.
fn split_front_matter(source: &str) -> Result<(&str, &str), ParseError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lines = source.split_inclusive('\n');
    match lines.next() {
        Some(first) if first.trim_end() == FENCE => {}
        _ => return Err(ParseError::MissingFrontMatter),
    }

    let yaml_start = source.find('\n').map(|i| i + 1).unwrap_or(source.len());
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == FENCE {
            let yaml = &source[yaml_start..offset];
            let body = &source[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }
    Err(ParseError::UnterminatedFrontMatter)
}

pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut rendered, Parser::new_ext(markdown, options));
    rendered
}

/// Parses one markdown source. The slug comes from the file name, never from
/// the front matter.
pub fn parse_article(source: &[u8], slug: &str) -> Result<Article, ParseError> {
    let text = std::str::from_utf8(source)?;
    let (yaml, body) = split_front_matter(text)?;
    let front: FrontMatter = if yaml.trim().is_empty() {
        serde_yaml::from_str("{}")?
    } else {
        serde_yaml::from_str(yaml)?
    };

    Ok(Article {
        meta: ArticleMeta {
            slug: slug.to_string(),
            title: front.title,
            summary: front.summary,
            date: date_text(front.date),
            published: front.published,
        },
        content: render_markdown(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "---\ntitle: Hello\nsummary: \"First post\"\ndate: 2025-03-01\npublished: true\n---\n# Heading\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~ - [x] done\n";

    #[test]
    fn test_parse_article() {
        let article = parse_article(POST.as_bytes(), "hello").unwrap();
        assert_eq!(article.meta.slug, "hello");
        assert_eq!(article.meta.title, "Hello");
        assert_eq!(article.meta.summary, "First post");
        assert_eq!(article.meta.date, "2025-03-01");
        assert!(article.meta.published);
        assert!(article.content.contains("<h1>Heading</h1>"));
        assert!(article.content.contains("<table>"));
        assert!(article.content.contains("<del>old</del>"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let first = parse_article(POST.as_bytes(), "hello").unwrap();
        let second = parse_article(POST.as_bytes(), "hello").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_published_defaults_to_false() {
        let article = parse_article(b"---\ntitle: Draft\n---\nbody\n", "draft").unwrap();
        assert!(!article.meta.published);
        assert_eq!(article.content, "<p>body</p>\n");
    }

    #[test]
    fn test_crlf_and_empty_front_matter() {
        let article = parse_article(b"---\r\n---\r\ntext\r\n", "bare").unwrap();
        assert_eq!(article.meta.title, "");
        assert!(article.content.contains("text"));
    }

    #[test]
    fn test_front_matter_errors() {
        assert!(matches!(
            parse_article(b"# no front matter", "x"),
            Err(ParseError::MissingFrontMatter)
        ));
        assert!(matches!(
            parse_article(b"---\ntitle: open\n", "x"),
            Err(ParseError::UnterminatedFrontMatter)
        ));
        assert!(matches!(
            parse_article(b"---\ntitle: [unclosed\n---\n", "x"),
            Err(ParseError::FrontMatter(_))
        ));
    }

    #[test]
    fn test_slug_is_not_taken_from_front_matter() {
        let article = parse_article(b"---\nslug: other\npublished: true\n---\n", "real").unwrap();
        assert_eq!(article.meta.slug, "real");
    }
}
