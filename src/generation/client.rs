use std::time::Duration;

use axum::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::generation::config::GenerationConfig;

/// Prompt used to check that a model deployment answers at all.
pub const PROBE_PROMPT: &str = "Hello";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("model returned no text")]
    EmptyResponse,

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// Black-box "generate text from prompt" capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a completion for `prompt` with the named model. `config` is
    /// omitted from the request when `None`, leaving the service defaults.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        config: Option<&GenerationConfig>,
    ) -> Result<String, GenerationError>;

    /// Minimal generation call; any returned text counts as success.
    async fn probe(&self, model: &str) -> Result<(), GenerationError> {
        self.generate(model, PROBE_PROMPT, None).await.map(|_| ())
    }

    /// Whether the generator holds a credential for the remote service.
    fn is_configured(&self) -> bool {
        true
    }
}

/// `generateContent` client for the Gemini REST API.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: Url,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        // A missing trailing slash would make `join` drop the last path segment.
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };

        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            api_key: api_key.into(),
            base_url,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        Self::new(
            config.gemini_api_key.clone(),
            &config.gemini_base_url,
            config.request_timeout(),
        )
    }

    fn endpoint(&self, model: &str) -> Result<Url, GenerationError> {
        let mut url = self
            .base_url
            .join(&format!("v1beta/models/{model}:generateContent"))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<&'a GenerationConfig>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, GenerationError> {
        let content = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .ok_or(GenerationError::EmptyResponse)?;

        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[tracing::instrument(level = "debug", skip(self, prompt, config))]
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        config: Option<&GenerationConfig>,
    ) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: config,
        };

        // The endpoint carries the API key, keep it out of error messages.
        let resp = self
            .http
            .post(self.endpoint(model)?)
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let text = resp
            .json::<GenerateContentResponse>()
            .await
            .map_err(reqwest::Error::without_url)?
            .into_text()?;
        debug!(model, chars = text.len(), "Received completion");
        Ok(text)
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> GeminiClient {
        GeminiClient::new("secret", base_url, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let url = client("https://proxy.example.com/gemini")
            .endpoint("gemini-1.5-flash")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://proxy.example.com/gemini/v1beta/models/gemini-1.5-flash:generateContent?key=secret"
        );
    }

    #[test]
    fn probe_request_omits_generation_config() {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: PROBE_PROMPT }],
            }],
            generation_config: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "Hello");
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn response_parts_are_joined() {
        let resp: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"min_price\": 10,"},{"text":" \"max_price\": 20}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(
            resp.into_text().unwrap(),
            r#"{"min_price": 10, "max_price": 20}"#
        );
    }

    #[test]
    fn missing_candidates_is_empty_response() {
        let resp: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(resp.into_text(), Err(GenerationError::EmptyResponse)));

        let resp: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(matches!(resp.into_text(), Err(GenerationError::EmptyResponse)));
    }

    #[test]
    fn empty_key_is_not_configured() {
        let client = GeminiClient::new("", "http://localhost", Duration::from_secs(1)).unwrap();
        assert!(!client.is_configured());
    }
}
