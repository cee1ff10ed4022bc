//! Model interaction: submit the document and prompt in one generateContent
//! call.
//!
//! This module is intentionally thin — all prompt engineering lives in
//! [`crate::prompts`] so it can be changed without touching transport or
//! error handling here. There are no retries: the handler treats the model
//! call as a single blocking operation and surfaces any failure as a typed
//! domain error.
//!
//! [`GenerativeModel`] is the seam the rest of the crate depends on; the
//! HTTP server injects a [`GeminiClient`] at startup, and tests inject mocks.

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::pipeline::fetch::DocumentPart;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A multimodal completion backend: document bytes + prompt in, text out.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(
        &self,
        document: &DocumentPart,
        prompt: &str,
    ) -> Result<String, AnalysisError>;
}

impl std::fmt::Debug for dyn GenerativeModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn GenerativeModel")
    }
}

/// Client for the Gemini `generateContent` REST endpoint.
#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client from the analysis configuration.
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        if config.api_key.is_empty() {
            return Err(AnalysisError::ModelNotConfigured {
                hint: "Set GEMINI_API_KEY or inject a model provider.".into(),
            });
        }
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| AnalysisError::Api {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    InlineData { inline_data: Blob },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct Blob {
    mime_type: String,
    data: String,
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    /// One completion call: the document as a typed binary part, then the
    /// prompt text, mirroring the part order the prompt was tuned with.
    async fn generate(
        &self,
        document: &DocumentPart,
        prompt: &str,
    ) -> Result<String, AnalysisError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: Blob {
                            mime_type: document.mime_type.to_string(),
                            data: BASE64.encode(&document.bytes),
                        },
                    },
                    Part::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
        };

        info!(
            "Calling {} with a {}-byte {} document",
            self.model,
            document.bytes.len(),
            document.mime_type
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Api {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api {
                message: format!("HTTP {status}: {}", body.trim()),
            });
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(|e| AnalysisError::Api {
                message: format!("unreadable generateContent response: {e}"),
            })?;

        let text: String = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AnalysisError::Api {
                message: "model response contained no text candidates".into(),
            });
        }

        debug!("Model returned {} chars", text.len());
        Ok(text)
    }
}
