//! Remote text-generation backends for tips.
//!
//! [`TipModel`] is the seam the generator depends on; tests substitute a
//! mock, production uses [`OpenAiChatModel`] against any OpenAI-compatible
//! `/chat/completions` endpoint.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::TipError;
use crate::config::RemoteEndpoint;

/// System message sent with every request.
pub const SYSTEM_PROMPT: &str = "You are a sustainability assistant.";

/// Render the user prompt for a day's activity summary and total.
pub fn tip_prompt(activities: &str, emissions: f64) -> String {
    format!(
        "You are a helpful sustainability coach.\n\
         \n\
         User's daily activities: {activities}\n\
         Total CO₂ emitted today: {emissions:.2} kg\n\
         \n\
         Provide a concise, practical eco-friendly tip tailored to reduce their largest CO₂ source.\n\
         Requirements:\n\
         - Keep it positive and motivational.\n\
         - Limit to 1-2 short sentences (or 1-2 bullet points max).\n\
         - Prefer concrete, easy actions the user can do today or tomorrow."
    )
}

/// A backend that turns a prompt into tip text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TipModel: Send + Sync {
    /// Generate raw (untrimmed) text for `prompt`.
    ///
    /// Transient problems must be reported as [`TipError::Service`] so the
    /// caller can retry them.
    async fn complete(&self, prompt: &str) -> Result<String, TipError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// OpenAI-compatible chat completion client.
pub struct OpenAiChatModel {
    endpoint: RemoteEndpoint,
    client: reqwest::Client,
}

impl OpenAiChatModel {
    /// Upper bound on generated tokens per tip.
    pub const MAX_TOKENS: u32 = 120;
    pub const TEMPERATURE: f32 = 0.7;

    pub fn new(endpoint: RemoteEndpoint) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(endpoint.timeout)
            .build()
            .with_context(|| format!("Failed to build HTTP client for {}", endpoint.url))?;
        Ok(Self { endpoint, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.url.trim_end_matches('/'))
    }

    pub fn model_name(&self) -> &str {
        &self.endpoint.model
    }

    pub fn timeout(&self) -> Duration {
        self.endpoint.timeout
    }
}

impl std::fmt::Debug for OpenAiChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatModel")
            .field("url", &self.endpoint.url)
            .field("model", &self.endpoint.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TipModel for OpenAiChatModel {
    async fn complete(&self, prompt: &str) -> Result<String, TipError> {
        let start = Instant::now();
        let body = ChatRequest {
            model: &self.endpoint.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: Self::MAX_TOKENS,
            temperature: Self::TEMPERATURE,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.endpoint.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TipError::Service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TipError::Service(format!(
                "chat completion failed ({status}): {detail}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| TipError::Unexpected(format!("invalid completion body: {e}")))?;

        debug!(
            model = %self.endpoint.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "chat completion received"
        );

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| TipError::Unexpected("completion has no choices".into()))
    }
}
