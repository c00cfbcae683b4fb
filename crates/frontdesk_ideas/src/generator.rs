// --- File: crates/frontdesk_ideas/src/generator.rs ---
//! Text generation over Vertex AI.

use std::sync::Arc;

use frontdesk_common::gcp::CLOUD_PLATFORM_SCOPE;
use frontdesk_common::{error_body, BoxFuture, TokenProvider};
use frontdesk_config::IdeasConfig;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("model authentication failed: {0}")]
    Auth(String),
    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("model returned no text")]
    EmptyResponse,
    #[error("invalid model endpoint: {0}")]
    Url(String),
}

pub trait TextGenerator: Send + Sync {
    /// One completion for `prompt`; no retries.
    fn generate(&self, prompt: &str) -> BoxFuture<'_, String, GenerationError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Gemini through the Vertex AI `generateContent` endpoint.
pub struct VertexGenerator {
    client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    base_url: String,
    project_id: String,
    location: String,
    model: String,
}

impl VertexGenerator {
    pub fn new(client: reqwest::Client, tokens: Arc<dyn TokenProvider>, config: &IdeasConfig) -> Self {
        Self {
            client,
            tokens,
            base_url: format!("https://{}-aiplatform.googleapis.com", config.location),
            project_id: config.project_id.clone(),
            location: config.location.clone(),
            model: config.model.clone(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    fn endpoint(&self) -> Result<Url, GenerationError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| GenerationError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GenerationError::Url(self.base_url.clone()))?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.project_id.as_str(),
                "locations",
                self.location.as_str(),
                "publishers",
                "google",
                "models",
            ])
            .push(&format!("{}:generateContent", self.model));
        Ok(url)
    }
}

impl TextGenerator for VertexGenerator {
    fn generate(&self, prompt: &str) -> BoxFuture<'_, String, GenerationError> {
        let prompt = prompt.to_string();
        Box::pin(async move {
            let url = self.endpoint()?;
            let token = self
                .tokens
                .access_token(&[CLOUD_PLATFORM_SCOPE])
                .await
                .map_err(|e| GenerationError::Auth(e.to_string()))?;
            let body = GenerateRequest {
                contents: [Content {
                    role: "user",
                    parts: [Part { text: &prompt }],
                }],
            };

            let response = self
                .client
                .post(url)
                .bearer_auth(token)
                .json(&body)
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(GenerationError::Api {
                    status: status.as_u16(),
                    message: error_body(response).await,
                });
            }

            let reply: GenerateResponse = response.json().await?;
            let text = reply
                .candidates
                .into_iter()
                .next()
                .and_then(|candidate| candidate.content)
                .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
                .filter(|text| !text.trim().is_empty())
                .ok_or(GenerationError::EmptyResponse)?;
            debug!("Model {} answered with {} bytes", self.model, text.len());
            Ok(text)
        })
    }
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Answers every prompt with a fixed reply and remembers the prompts.
    pub struct ScriptedGenerator {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Fails every call as if the model were down.
        pub fn failing() -> Self {
            Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn generate(&self, prompt: &str) -> BoxFuture<'_, String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let reply = self.reply.clone();
            Box::pin(async move {
                reply.ok_or(GenerationError::Api {
                    status: 503,
                    message: "model unavailable".into(),
                })
            })
        }
    }
}
