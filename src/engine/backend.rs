//! Generative Backend
//!
//! Capability interface to the external language model, plus the concrete
//! Gemini REST adapter. The engines depend only on [`GenerativeBackend`] and
//! branch on [`BackendError`] outcomes; no exception-style control flow.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Every way a generation attempt can fail. The engines treat all variants
/// the same (fallback output), the variants exist for logging and tests.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Unavailable(String),
    #[error("backend request timed out")]
    Timeout,
    #[error("backend returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("backend reply could not be decoded: {0}")]
    Malformed(String),
    #[error("backend returned an empty reply")]
    EmptyReply,
}

/// Fixed sampling parameters sent with every request. Serialized directly
/// into the Gemini `generationConfig` object.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 1024,
        }
    }
}

/// The opaque capability: text in, text or failure out.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, BackendError>;
}

// ============================================================
// GEMINI REST ADAPTER
// ============================================================

/// Adapter over the Gemini `generateContent` REST endpoint.
pub struct GeminiBackend {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    /// The timeout bounds the whole request; an expired timeout surfaces as
    /// [`BackendError::Timeout`] and is handled like any other failure.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| BackendError::Unavailable(err.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, BackendError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: options.clone(),
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    BackendError::Timeout
                } else {
                    BackendError::Unavailable(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(BackendError::Http {
                status: status.as_u16(),
                message: summarize_error_body(&body_text),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| BackendError::Malformed(err.to_string()))?;

        let text = parsed
            .candidates
            .and_then(|mut candidates| candidates.pop())
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
            .ok_or(BackendError::EmptyReply)?;

        if text.trim().is_empty() {
            return Err(BackendError::EmptyReply);
        }
        Ok(text)
    }
}

/// Pulls the human-readable message out of a Gemini error body, falling back
/// to the raw body when it is not the documented shape.
fn summarize_error_body(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status = wrapper.error.status.unwrap_or_default();
            let message = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status.is_empty() {
                message
            } else {
                format!("{}: {}", status, message)
            }
        })
        .unwrap_or_else(|_| body.to_string())
}

// Wire types for the generateContent endpoint.

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationOptions,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

// ============================================================
// TEST BACKENDS
// ============================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_options_serialize_to_camel_case() {
        let json = serde_json::to_value(GenerationOptions::default()).unwrap();
        assert!(json.get("topP").is_some());
        assert!(json.get("topK").is_some());
        assert!(json.get("maxOutputTokens").is_some());
    }

    #[test]
    fn error_body_summary_prefers_structured_message() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            summarize_error_body(body),
            "RESOURCE_EXHAUSTED: Quota exceeded"
        );
        assert_eq!(summarize_error_body("plain text"), "plain text");
    }
}
