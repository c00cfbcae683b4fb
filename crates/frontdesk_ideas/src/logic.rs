// --- File: crates/frontdesk_ideas/src/logic.rs ---
use std::sync::Arc;

use frontdesk_config::IdeaResponseFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::generator::{GenerationError, TextGenerator};

#[derive(Error, Debug)]
pub enum IdeasError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("model response is not a JSON idea list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("model response contained no ideas")]
    NoIdeas,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Idea {
    pub title: String,
    #[serde(default)]
    pub summary: String,
}

pub fn build_prompt(topic: &str, format: IdeaResponseFormat) -> String {
    let shape = match format {
        IdeaResponseFormat::Json => {
            "Format the output as a valid JSON array of objects, where each object has a \"title\" \
and a \"summary\" field. Do not include any other text or explanations outside of the JSON array."
        }
        IdeaResponseFormat::Lines => {
            "Put each idea on its own line as \"Title: summary\". Do not number the lines and do not \
add any other text."
        }
    };
    format!(
        "You are a world-class data strategy consultant. A potential client has provided the \
following topic: '{}'. Generate 3 to 5 creative and insightful blog post titles based on this \
topic. For each title, provide a compelling one-sentence summary. {}",
        topic, shape
    )
}

/// Removes a surrounding markdown code fence such as `` ```json ... ``` ``.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") up to the end of the opening line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim_end().trim_end_matches("```").trim()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "))
    {
        return rest.trim();
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim();
        }
    }
    line
}

fn idea_from_line(line: &str) -> Option<Idea> {
    let line = strip_list_marker(line).replace("**", "");
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (title, summary) = line
        .split_once(": ")
        .or_else(|| line.split_once(" - "))
        .unwrap_or((line, ""));
    let title = title.trim().trim_matches('"').trim();
    if title.is_empty() {
        return None;
    }
    Some(Idea {
        title: title.to_string(),
        summary: summary.trim().to_string(),
    })
}

pub fn parse_ideas(text: &str, format: IdeaResponseFormat) -> Result<Vec<Idea>, IdeasError> {
    let body = strip_code_fences(text);
    let ideas: Vec<Idea> = match format {
        IdeaResponseFormat::Json => serde_json::from_str::<Vec<Idea>>(body)?
            .into_iter()
            .filter(|idea| !idea.title.trim().is_empty())
            .collect(),
        IdeaResponseFormat::Lines => body.lines().filter_map(idea_from_line).collect(),
    };
    if ideas.is_empty() {
        return Err(IdeasError::NoIdeas);
    }
    Ok(ideas)
}

pub struct IdeaGenerator {
    generator: Arc<dyn TextGenerator>,
    format: IdeaResponseFormat,
}

impl IdeaGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, format: IdeaResponseFormat) -> Self {
        Self { generator, format }
    }

    pub async fn generate(&self, topic: &str) -> Result<Vec<Idea>, IdeasError> {
        let reply = self
            .generator
            .generate(&build_prompt(topic, self.format))
            .await?;
        let ideas = parse_ideas(&reply, self.format).inspect_err(|e| {
            warn!("Unusable model response for {:?}: {}", topic, e);
        })?;
        info!("💡 Generated {} ideas", ideas.len());
        Ok(ideas)
    }
}
