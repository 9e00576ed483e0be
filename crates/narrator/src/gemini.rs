//! Gemini generative text client

use crate::{NarratorError, Result, TextGenerator};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Client for the `generateContent` endpoint
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiClient {
    pub fn new(api_key: &str, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        if api_key.is_empty() {
            return Err(NarratorError::MissingCredential);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| NarratorError::Api(format!("invalid API key header: {}", e)))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_p: 0.9,
                top_k: 40,
            },
        };

        let response = self.client.post(self.endpoint()).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(NarratorError::Api(format!(
                "Gemini API error: {} {}",
                status,
                detail.trim()
            )));
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed.into_text().ok_or(NarratorError::EmptyResponse)?;

        debug!(model = %self.model, chars = text.len(), "Received generated text");
        Ok(text)
    }
}
