//! Gemini `generateContent` client.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::GenerateError;
use crate::generator::TextGenerator;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// HTTP client for one Gemini model.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a client for `model` at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GenerateError::InvalidEndpoint`] if `base_url` does not
    /// parse.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, GenerateError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let invalid = |reason: String| GenerateError::InvalidEndpoint {
            url: base_url.to_string(),
            reason,
        };
        let mut endpoint = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| invalid(e.to_string()))?;
        let method = format!("{model}:generateContent");
        endpoint
            .path_segments_mut()
            .map_err(|()| invalid("URL cannot be used as a base".to_string()))?
            .pop_if_empty()
            .extend(["v1beta", "models", method.as_str()]);

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_owned(),
        })
    }

    /// Concatenated text parts of the first candidate.
    fn first_candidate_text(response: GenerateResponse) -> Option<String> {
        let content = response.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };
        let response = self.client.post(url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_owned)
                })
                .unwrap_or_else(|| status.to_string());
            return Err(GenerateError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(GenerateError::Deserialize)?;
        let text = Self::first_candidate_text(parsed).ok_or(GenerateError::EmptyResponse)?;
        tracing::debug!(chars = text.len(), "generated reply draft");
        Ok(text)
    }
}
