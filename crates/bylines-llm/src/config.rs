//! Backend configuration.

use std::time::Duration;

/// Environment variables consulted for the API key, in order.
pub const API_KEY_VARS: &[&str] = &["OPENAI_TEST_KEY", "OPENAI_API_KEY"];

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for [`OpenAiBackend`](crate::OpenAiBackend).
#[derive(Clone)]
pub struct OpenAiConfig {
    /// Bearer token. `None` makes every completion fail as unavailable.
    pub api_key: Option<String>,
    pub model: String,
    /// Endpoint root, without the trailing `/chat/completions`.
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: 500,
            temperature: 0.1,
            request_timeout: Duration::from_secs(30),
        }
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `OPENAI_TEST_KEY` / `OPENAI_API_KEY`, `OPENAI_MODEL` and
    /// `OPENAI_BASE_URL` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut config = Self::default();
        config.api_key = API_KEY_VARS.iter().find_map(|name| var(*name));
        if let Some(model) = var("OPENAI_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = var("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        config
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
