//! Chat advisors: the model backend that turns a goals prompt into advice.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[async_trait]
pub trait ChatAdvisor: Send + Sync {
    async fn advise(&self, prompt: &str) -> Result<String>;
}

/// Used when no model credentials are configured. Every request fails.
pub struct MissingChatAdvisor;

#[async_trait]
impl ChatAdvisor for MissingChatAdvisor {
    async fn advise(&self, _prompt: &str) -> Result<String> {
        Err(anyhow!("chat advisor is unavailable"))
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Google Gemini `generateContent` over REST.
pub struct GeminiAdvisor {
    http: Client,
    config: GeminiConfig,
}

impl GeminiAdvisor {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl ChatAdvisor for GeminiAdvisor {
    async fn advise(&self, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };
        let res = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("failed to reach gemini")?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            return Err(anyhow!("gemini returned {status}: {detail}"));
        }

        let parsed: GenerateContentResponse = res
            .json()
            .await
            .context("failed to decode gemini response")?;
        first_candidate_text(parsed).ok_or_else(|| anyhow!("gemini response contained no text"))
    }
}

fn first_candidate_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    (!text.is_empty()).then_some(text)
}
