//! Configuration for transcript analysis.
//!
//! All behaviour is controlled through [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share the config across handlers and to see in one place what
//! a deployment depends on: the API credential, the model id, and where the
//! office converter lives.
//!
//! # Design choice: credential as explicit state
//! The API key is a plain field sourced at startup (environment, CLI, secret
//! store — the binary decides) and injected here. Nothing in the library
//! reads ambient credentials at call time, which keeps tests hermetic and
//! makes key rotation a restart-level concern instead of a code change.

use crate::error::AnalysisError;
use crate::pipeline::gemini::GenerativeModel;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default Gemini REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model identifier, matching the deployed prompt's expectations.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for a transcript analysis.
///
/// Built via [`AnalysisConfig::builder()`].
///
/// # Example
/// ```rust
/// use analise_historico::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .api_key("AIza...")
///     .model("gemini-2.5-flash")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Gemini API key. Required unless a pre-built [`GenerativeModel`] is
    /// injected via `model_provider`.
    pub api_key: String,

    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Base URL of the generateContent endpoint. Default:
    /// [`DEFAULT_API_BASE_URL`]. Overridable for proxies and tests.
    pub api_base_url: String,

    /// Pre-constructed model client. Takes precedence over `api_key` /
    /// `model` / `api_base_url`. Useful in tests or when the caller needs
    /// custom middleware around the model call.
    pub model_provider: Option<Arc<dyn GenerativeModel>>,

    /// Document download timeout in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// generateContent call timeout in seconds. Default: 300.
    ///
    /// A multi-page scanned transcript plus the full extraction prompt is a
    /// slow request; five minutes is generous without being unbounded.
    pub api_timeout_secs: u64,

    /// Explicit path to the LibreOffice `soffice` executable.
    ///
    /// If `None`, resolution falls back to the `SOFFICE_PATH` environment
    /// variable, then per-platform well-known install locations, then
    /// `soffice` on `PATH`.
    pub soffice_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model_provider: None,
            download_timeout_secs: 120,
            api_timeout_secs: 300,
            soffice_path: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field(
                "model_provider",
                &self.model_provider.as_ref().map(|_| "<dyn GenerativeModel>"),
            )
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("soffice_path", &self.soffice_path)
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn model_provider(mut self, provider: Arc<dyn GenerativeModel>) -> Self {
        self.config.model_provider = Some(provider);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs.max(1);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn soffice_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.soffice_path = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, AnalysisError> {
        let c = &self.config;
        if c.api_key.is_empty() && c.model_provider.is_none() {
            return Err(AnalysisError::ModelNotConfigured {
                hint: "Set GEMINI_API_KEY or inject a model provider.".into(),
            });
        }
        if c.model.is_empty() {
            return Err(AnalysisError::Internal("model id must not be empty".into()));
        }
        Ok(self.config)
    }
}
