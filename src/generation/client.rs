use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::error::GenerationError;
use super::request::{
    ChatRequest, ImageOptions, ImageRequest, TextOptions, VISUALS_MAX_TOKENS, VISUALS_TEMPERATURE,
    research_visuals_prompt,
};
use crate::paper::PaperData;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable consulted when no key is passed explicitly.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Read the API key from the environment. Empty values count as unset.
pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty())
}

/// Connection settings for a [`GenerationClient`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    /// Defaults to [`DEFAULT_BASE_URL`]
    pub base_url: Option<String>,
}

/// Client for the image and text generation endpoints.
///
/// Holds no per-call state; each method issues exactly one request.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GenerationClient {
    /// Build a client from an explicit key, falling back to `OPENAI_API_KEY`.
    pub fn new(api_key: Option<String>) -> Self {
        let api_key = api_key
            .filter(|key| !key.is_empty())
            .or_else(api_key_from_env);
        Self::from_config(ClientConfig {
            api_key,
            base_url: None,
        })
    }

    /// Build a client from explicit settings. The environment is not read.
    pub fn from_config(config: ClientConfig) -> Self {
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        Self {
            http: Client::new(),
            api_key: config.api_key.filter(|key| !key.is_empty()),
            base_url,
        }
    }

    /// Use a preconfigured HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /images/generations`.
    pub async fn generate_image(
        &self,
        prompt: &str,
        options: &ImageOptions,
    ) -> Result<Value, GenerationError> {
        let body = ImageRequest::new(prompt, options);
        tracing::debug!(model = body.model, size = body.size, n = body.n, "generation.image");
        self.post_json("/images/generations", &body).await
    }

    /// `POST /chat/completions` with a single user message.
    pub async fn generate_text(
        &self,
        prompt: &str,
        options: &TextOptions,
    ) -> Result<Value, GenerationError> {
        let body = ChatRequest::new(prompt, options);
        tracing::debug!(
            model = body.model,
            max_tokens = body.max_tokens,
            temperature = body.temperature,
            "generation.text"
        );
        self.post_json("/chat/completions", &body).await
    }

    /// Ask for presentation ideas for a paper.
    pub async fn generate_research_visuals(
        &self,
        paper: &PaperData,
    ) -> Result<Value, GenerationError> {
        let prompt = research_visuals_prompt(paper);
        let options = TextOptions::default()
            .with_max_tokens(VISUALS_MAX_TOKENS)
            .with_temperature(VISUALS_TEMPERATURE);
        self.generate_text(&prompt, &options).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, GenerationError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!(path, "generation.missing_api_key");
            return Err(GenerationError::MissingApiKey);
        };
        let url = format!("{}{path}", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(%url, error = %err, "generation.transport_error");
                GenerationError::Transport(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            let err = GenerationError::Api {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            };
            tracing::error!(%url, error = %err, "generation.error");
            return Err(err);
        }

        response.json::<Value>().await.map_err(|err| {
            tracing::error!(%url, error = %err, "generation.decode_error");
            GenerationError::Transport(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_trims_trailing_slash() {
        let client = GenerationClient::from_config(ClientConfig {
            api_key: Some("k".to_string()),
            base_url: Some("http://localhost:9000/v1/".to_string()),
        });
        assert_eq!(client.base_url(), "http://localhost:9000/v1");
        assert!(client.has_api_key());
    }

    #[test]
    fn test_from_config_defaults_base_url() {
        let client = GenerationClient::from_config(ClientConfig::default());
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert!(!client.has_api_key());
    }

    #[test]
    fn test_empty_key_counts_as_missing() {
        let client = GenerationClient::from_config(ClientConfig {
            api_key: Some(String::new()),
            base_url: None,
        });
        assert!(!client.has_api_key());
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        // Port 9 (discard) is never contacted: the key check comes first.
        let client = GenerationClient::from_config(ClientConfig {
            api_key: None,
            base_url: Some("http://127.0.0.1:9".to_string()),
        });
        let err = client
            .generate_image("a cat", &ImageOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));
    }
}
