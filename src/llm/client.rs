use super::{token::*, types::*};
use crate::{
    Error, Result,
    config::{LlmConfig, LlmProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
// Outer bound only; each route enforces its own, shorter deadline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends the parts as a single user turn and returns the model's text.
    async fn generate_content(&self, parts: Vec<Part>) -> Result<String>;
}

enum Credentials {
    Bearer(Arc<dyn TokenSource>),
    ApiKey(String),
}

/// `generateContent` client for Gemini models served by Vertex AI or the
/// Gemini API.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    credentials: Credentials,
    provider: LlmProvider,
}

impl GeminiClient {
    /// Builds a client from static credentials only: `access_token` for
    /// Vertex AI, `api_key` for the Gemini API.
    pub fn new(config: LlmConfig) -> Result<Self> {
        let credentials = match config.provider {
            LlmProvider::VertexAi => {
                let token = non_empty(config.access_token.as_deref())
                    .ok_or_else(|| Error::config("Vertex AI access token is not configured"))?;
                Credentials::Bearer(Arc::new(StaticToken::new(token)))
            }
            LlmProvider::Gemini => Credentials::ApiKey(
                non_empty(config.api_key.as_deref())
                    .ok_or_else(|| Error::config("Gemini API key is not configured"))?
                    .to_string(),
            ),
        };

        Self::build(config, credentials)
    }

    /// Vertex AI client that asks `tokens` for a bearer token on every call.
    pub fn with_token_source(config: LlmConfig, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        if config.provider != LlmProvider::VertexAi {
            return Err(Error::config(
                "token sources only apply to the vertex_ai provider",
            ));
        }

        Self::build(config, Credentials::Bearer(tokens))
    }

    /// Like [`GeminiClient::new`], but a Vertex AI config without an
    /// `access_token` falls back to Application Default Credentials.
    pub async fn connect(config: LlmConfig) -> Result<Self> {
        let uses_adc = config.provider == LlmProvider::VertexAi
            && non_empty(config.access_token.as_deref()).is_none();
        if !uses_adc {
            return Self::new(config);
        }

        info!("No Vertex AI access token configured, using Application Default Credentials");
        let tokens = DefaultCredentials::discover().await?;
        Self::with_token_source(config, Arc::new(tokens))
    }

    fn build(config: LlmConfig, credentials: Credentials) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint: endpoint_url(&config),
            credentials,
            provider: config.provider,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn provider_name(&self) -> &'static str {
        match self.provider {
            LlmProvider::VertexAi => "Vertex AI",
            LlmProvider::Gemini => "Gemini API",
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn endpoint_url(config: &LlmConfig) -> String {
    let base = config.base_url.as_deref().map(|url| url.trim_end_matches('/'));

    match config.provider {
        LlmProvider::VertexAi => {
            let default_base = format!("https://{}-aiplatform.googleapis.com/v1", config.location);
            format!(
                "{}/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
                base.unwrap_or(default_base.as_str()),
                config.project_id,
                config.location,
                config.model
            )
        }
        LlmProvider::Gemini => format!(
            "{}/models/{}:generateContent",
            base.unwrap_or(GEMINI_API_BASE),
            config.model
        ),
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<String> {
        debug!(
            provider = self.provider_name(),
            part_count = parts.len(),
            "Sending generateContent request"
        );

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts: parts.iter().map(Part::to_request_part).collect(),
            }],
        };

        let builder = self.client.post(&self.endpoint).json(&request);
        let builder = match &self.credentials {
            Credentials::Bearer(tokens) => builder.bearer_auth(tokens.token().await?),
            Credentials::ApiKey(key) => builder.header("x-goog-api-key", key),
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::llm(format!(
                "{} error {}: {}",
                self.provider_name(),
                status,
                body
            )));
        }

        let response: GenerateContentResponse = serde_json::from_str(&body)?;

        debug!(
            candidates = response.candidates.len(),
            "Received generateContent response"
        );

        response
            .text()
            .ok_or_else(|| Error::llm(response.missing_text_reason()))
    }
}
