//! Normalisation of the model's free-text output into JSON.
//!
//! The prompt forbids markdown, but vision models still wrap their answer in
//! ```` ```json ```` fences often enough that stripping them is mandatory.
//! The rule is deliberately narrow: remove one outer fence pair (optionally
//! labelled `json`) if and only if it wraps the whole payload, never touch
//! anything inside. A fenced response and a bare response must parse to the
//! same value.

use crate::error::AnalysisError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\s*\n?(.*?)\n?```\s*$").unwrap());

/// Strip a single outer code-fence pair, if present.
fn strip_code_fences(input: &str) -> &str {
    let trimmed = input.trim();
    match RE_OUTER_FENCES.captures(trimmed) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(trimmed),
        None => trimmed,
    }
}

/// Parse the model's raw text output as JSON.
///
/// Returns [`AnalysisError::InvalidModelOutput`] when the text is not JSON
/// even after fence stripping — a declared outcome rather than a panic, so
/// the HTTP layer can map it to its fixed 500 envelope.
pub fn parse_model_output(raw: &str) -> Result<Value, AnalysisError> {
    let body = strip_code_fences(raw);
    serde_json::from_str(body).map_err(|e| AnalysisError::InvalidModelOutput {
        detail: e.to_string(),
    })
}
