//! Generative model client.
//!
//! The planner talks to the model through [`RoutineModel`] so tests can swap
//! in canned replies. [`GeminiClient`] is the production implementation over
//! the `generateContent` REST endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GeminiConfig;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Model request timed out")]
    Timeout,

    #[error("Model backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Model returned no text")]
    EmptyResponse,
}

/// Text-in, text-out access to a generative model.
#[async_trait]
pub trait RoutineModel: Send + Sync {
    /// Model identifier, for logs and status.
    fn name(&self) -> &str;

    /// Send one prompt and return the raw text reply.
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

// === API Request/Response Types ===

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
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

/// Gemini `generateContent` client.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build a client whose HTTP requests time out after `config.timeout`.
    pub fn new(config: &GeminiConfig) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl RoutineModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout
                } else {
                    ModelError::Network(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ModelError::Backend { status, message });
        }

        let body: GenerateContentResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::Timeout
            } else {
                ModelError::Network(e.to_string())
            }
        })?;

        body.into_text().ok_or(ModelError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(base_url: &str, timeout: Duration) -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-test".to_string(),
            base_url: base_url.to_string(),
            timeout,
        }
    }

    fn reply(text: &str) -> serde_json::Value {
        json!({
            "candidates": [
                { "content": { "parts": [ { "text": text } ], "role": "model" } }
            ]
        })
    }

    #[tokio::test]
    async fn sends_prompt_and_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [ { "parts": [ { "text": "plan my day" } ] } ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("[]")))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config(&server.uri(), Duration::from_secs(5))).unwrap();
        let text = client.complete("plan my day").await.unwrap();
        assert_eq!(text, "[]");
        assert_eq!(client.name(), "gemini-test");
    }

    #[tokio::test]
    async fn joins_multiple_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [
                    { "content": { "parts": [ { "text": "[{\"a\":" }, { "text": "1}]" } ] } }
                ]
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config(&server.uri(), Duration::from_secs(5))).unwrap();
        assert_eq!(client.complete("x").await.unwrap(), "[{\"a\":1}]");
    }

    #[tokio::test]
    async fn maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config(&server.uri(), Duration::from_secs(5))).unwrap();
        match client.complete("x").await.unwrap_err() {
            ModelError::Backend { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_candidates_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config(&server.uri(), Duration::from_secs(5))).unwrap();
        assert!(matches!(
            client.complete("x").await.unwrap_err(),
            ModelError::EmptyResponse
        ));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(reply("[]"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client =
            GeminiClient::new(&config(&server.uri(), Duration::from_millis(100))).unwrap();
        assert!(matches!(
            client.complete("x").await.unwrap_err(),
            ModelError::Timeout
        ));
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        // Nothing listens on port 9 (discard) in the test environment.
        let client =
            GeminiClient::new(&config("http://127.0.0.1:9", Duration::from_secs(2))).unwrap();
        assert!(matches!(
            client.complete("x").await.unwrap_err(),
            ModelError::Network(_) | ModelError::Timeout
        ));
    }
}
