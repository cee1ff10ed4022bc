//! Top-level analysis entry point.
//!
//! One request flows through four sequential, blocking stages: fetch the
//! document, build the prompt, call the model, normalise the output. There
//! is no queueing, retrying, or fan-out — the pipeline is a straight line
//! and any stage failure is a typed [`AnalysisError`].

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::pipeline::gemini::{GeminiClient, GenerativeModel};
use crate::pipeline::{fetch, normalize};
use crate::prompts;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Analyse a transcript document against the target curriculum.
///
/// # Arguments
/// * `historico_url` — HTTP/HTTPS URL of the transcript (image, PDF, or docx)
/// * `grade` — the new curriculum, passed to the model verbatim
/// * `config` — credentials, model id, timeouts, converter path
///
/// # Returns
/// The model's JSON comparison structure, opaque to this crate beyond being
/// well-formed JSON. The contract that every curriculum entry appears
/// exactly once in `comparacao_disciplinas` is owned by the prompt, not
/// enforced here.
pub async fn analyze(
    historico_url: &str,
    grade: &Value,
    config: &AnalysisConfig,
) -> Result<Value, AnalysisError> {
    info!("Starting transcript analysis: {}", historico_url);

    let document = fetch::fetch_document(historico_url, config).await?;
    let prompt = prompts::build_prompt(grade);
    let model = resolve_model(config)?;

    let raw = model.generate(&document, &prompt).await?;
    let detalhes = normalize::parse_model_output(&raw)?;

    info!("Transcript analysis complete");
    Ok(detalhes)
}

/// Resolve the model backend: an injected provider wins, otherwise build a
/// Gemini client from the configured credential.
///
/// The server binary injects a [`GeminiClient`] once at startup; this
/// fallback exists for library callers who only set `api_key`.
fn resolve_model(config: &AnalysisConfig) -> Result<Arc<dyn GenerativeModel>, AnalysisError> {
    if let Some(ref provider) = config.model_provider {
        return Ok(Arc::clone(provider));
    }
    Ok(Arc::new(GeminiClient::new(config)?))
}
