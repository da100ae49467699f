use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::NameServiceConfig;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that generates random names for gadgets. \
Assign a unique, randomly generated codename (e.g., The Nightingale, The Kraken) and other \
superficial and fictional names. Generate just one name per request. Do not include any \
explanation or additional text. Just return the name.";

/// Source of gadget codenames. An empty string means the source had nothing to offer.
#[async_trait]
pub trait NameGenerator: Send + Sync {
    async fn generate(&self) -> anyhow::Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
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

/// OpenAI-compatible chat-completions client (Groq by default).
#[derive(Clone)]
pub struct ChatNameGenerator {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl ChatNameGenerator {
    pub fn new(cfg: &NameServiceConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build name service http client")?;
        Ok(Self {
            client,
            url: cfg.url.clone(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        })
    }
}

#[async_trait]
impl NameGenerator for ChatNameGenerator {
    async fn generate(&self) -> anyhow::Result<String> {
        let payload = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            }],
        };

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("name service request")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("name service error {}: {}", status, body);
        }

        let body: ChatResponse = resp.json().await.context("name service response")?;
        let name = first_reply(body).map(|c| clean_name(&c)).unwrap_or_default();
        debug!(name = %name, "codename generated");
        Ok(name)
    }
}

fn first_reply(body: ChatResponse) -> Option<String> {
    body.choices.into_iter().next().and_then(|c| c.message.content)
}

/// Strips whitespace and wrapping quotes the model sometimes adds.
pub fn clean_name(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '`' | '*'))
        .trim()
        .to_string()
}
