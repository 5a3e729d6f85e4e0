//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::EnrichmentError;
use crate::models::config::EnrichmentConfig;

use super::{Enricher, EnrichmentOutcome, SYSTEM_PROMPT};

/// Receipt text is truncated to this many characters before sending.
const MAX_INPUT_CHARS: usize = 12_000;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Enricher backed by a `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct HttpEnricher {
    client: Client,
    config: EnrichmentConfig,
    api_key: Option<String>,
}

impl HttpEnricher {
    /// The API key is read from `config.api_key_env` at call time.
    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
            api_key: None,
        }
    }

    /// Use an explicit API key instead of the environment.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn resolve_key(&self) -> Result<String, EnrichmentError> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        std::env::var(&self.config.api_key_env)
            .map_err(|_| EnrichmentError::MissingApiKey(self.config.api_key_env.clone()))
    }

    fn build_request(&self, text: &str) -> ChatRequest<'_> {
        let text: String = text.chars().take(MAX_INPUT_CHARS).collect();
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("Texto del comprobante:\n\n{}", text),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        }
    }

    async fn complete(&self, text: &str) -> Result<String, EnrichmentError> {
        let api_key = self.resolve_key()?;
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.build_request(text))
            .send()
            .await
            .map_err(|e| EnrichmentError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Request(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(EnrichmentError::EmptyCompletion)
    }
}

#[async_trait]
impl Enricher for HttpEnricher {
    async fn enrich(&self, text: &str) -> EnrichmentOutcome {
        match self.complete(text).await {
            Ok(content) => {
                info!(model = %self.config.model, "Enrichment completed ({} chars)", content.len());
                EnrichmentOutcome::Completed(content)
            }
            Err(e) => {
                warn!(model = %self.config.model, "Enrichment failed: {}", e);
                EnrichmentOutcome::Failed(e.to_string())
            }
        }
    }
}
