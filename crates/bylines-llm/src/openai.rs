//! OpenAI chat-completions client.

use async_trait::async_trait;
use bylines_core::{BylinesError, CompletionBackend, Prompt, PromptFallback, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::OpenAiConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl<'a> ChatRequest<'a> {
    fn new(config: &'a OpenAiConfig, prompt: &'a Prompt) -> Self {
        Self {
            model: &config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Pulls the first choice's text out of a chat-completions payload.
fn first_choice_text(payload: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(payload)
        .map_err(|e| BylinesError::MalformedResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| BylinesError::MalformedResponse("response has no choices".into()))
}

/// [`CompletionBackend`] over an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiBackend {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiBackend {
    /// Builds the HTTP client.
    ///
    /// A missing API key is not an error here; it surfaces as
    /// [`BylinesError::FallbackUnavailable`] on each call so an extractor can
    /// still be built and used deterministically.
    ///
    /// # Errors
    ///
    /// Returns `BylinesError::FallbackTransport` if the TLS backend cannot be
    /// initialised.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BylinesError::FallbackTransport(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(BylinesError::FallbackUnavailable(
                "no API key configured (set OPENAI_TEST_KEY or OPENAI_API_KEY)".into(),
            ));
        };

        let url = self.config.completions_url();
        debug!(model = %self.config.model, %url, "sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&ChatRequest::new(&self.config, prompt))
            .send()
            .await
            .map_err(|e| BylinesError::FallbackTransport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BylinesError::FallbackTransport(e.to_string()))?;

        if !status.is_success() {
            warn!(%status, "completion request failed");
            return Err(BylinesError::FallbackTransport(format!("HTTP {status}: {body}")));
        }

        first_choice_text(&body)
    }
}

/// Prompt-driven fallback over an [`OpenAiBackend`].
///
/// # Errors
///
/// See [`OpenAiBackend::new`].
pub fn openai_fallback(config: OpenAiConfig) -> Result<PromptFallback<OpenAiBackend>> {
    Ok(PromptFallback::new(OpenAiBackend::new(config)?))
}
