//! Error types for the analise-historico library.
//!
//! A single enum covers every failure the analysis pipeline can produce, but
//! the variants fall into two classes with different HTTP mappings:
//!
//! * **Domain failures** — the request was understood but the document could
//!   not be analysed (unsupported type, download error, converter failure,
//!   model API error). The server reports these as a `"nao processado"`
//!   envelope with HTTP 200; the caller inspects the body, not the status.
//!
//! * **Internal failures** — the model answered but its output was not JSON,
//!   or something unexpected broke. These map to the fixed 500 envelope.
//!
//! [`AnalysisError::is_internal`] is the single place that classification
//! lives, so the HTTP layer never matches on individual variants.

use thiserror::Error;

/// All errors returned by the transcript-analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    // ── Dispatch errors ───────────────────────────────────────────────────
    /// The transcript URL ends in an extension we cannot send to the model.
    ///
    /// Supported: jpg, jpeg, png, tiff, pdf, docx.
    #[error("Tipo de arquivo não suportado: '{extension}'")]
    UnsupportedFileType { extension: String },

    // ── Transport errors ──────────────────────────────────────────────────
    /// The document URL was reachable but the download failed.
    #[error("Failed to download '{url}': {reason}")]
    Download { url: String, reason: String },

    /// Document download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Office conversion errors ──────────────────────────────────────────
    /// No usable LibreOffice executable could be resolved.
    #[error(
        "Office converter not found: '{candidate}'\n\
         Install LibreOffice or set SOFFICE_PATH to the soffice executable."
    )]
    ConverterNotFound { candidate: String },

    /// The converter ran but did not produce a readable PDF.
    #[error("DOCX to PDF conversion failed: {detail}")]
    Conversion { detail: String },

    // ── Model errors ──────────────────────────────────────────────────────
    /// The model endpoint is not configured (missing API key and no
    /// injected provider).
    #[error("Generative model is not configured.\n{hint}")]
    ModelNotConfigured { hint: String },

    /// The generateContent call failed (network, HTTP status, or a response
    /// with no usable text).
    #[error("Model API error: {message}")]
    Api { message: String },

    /// The model answered, but the text was not parseable JSON even after
    /// fence stripping.
    #[error("Model returned invalid JSON: {detail}")]
    InvalidModelOutput { detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Whether this error maps to the 500 envelope rather than the
    /// `"nao processado"` domain-failure envelope.
    ///
    /// Invalid model output is deliberately grouped with internal errors:
    /// the original service let the parse failure reach its top-level
    /// catch-all and answered 500, and callers depend on that distinction.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidModelOutput { .. } | AnalysisError::Internal(_)
        )
    }
}
