//! # analise-historico
//!
//! Analyse Brazilian academic transcripts (histórico escolar) against a
//! target-course curriculum using a multimodal LLM, for credit-waiver
//! determination.
//!
//! ## Why a model, not a parser?
//!
//! Transcripts arrive as scans, photos, PDFs, and Word exports with wildly
//! varying layouts, stamps, and OCR noise. Instead of parsing them locally,
//! this crate sends the document to a vision model with a fixed extraction
//! prompt and lets the model do extraction, course matching, and waiver
//! scoring. Everything here is orchestration: validation, document
//! dispatch, prompt assembly, one API call, and normalisation of the
//! model's answer back into JSON.
//!
//! ## Pipeline Overview
//!
//! ```text
//! POST /analiseHistorico
//!  │
//!  ├─ 1. Validate  required fields (historico, aluno, grade)
//!  ├─ 2. Fetch     dispatch by extension: image / pdf / docx→pdf (soffice)
//!  ├─ 3. Prompt    fixed template + curriculum JSON
//!  ├─ 4. Model     one generateContent call (binary part + text)
//!  ├─ 5. Normalise strip ```json fences, parse as JSON
//!  └─ 6. Envelope  processado / nao processado / erro
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use analise_historico::{analyze, AnalysisConfig};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::builder()
//!         .api_key(std::env::var("GEMINI_API_KEY")?)
//!         .build()?;
//!     let grade = json!([{"codigo": "X1", "nome": "Cálculo I", "carga_horaria": 60}]);
//!     let detalhes = analyze("https://example.edu/historico.pdf", &grade, &config).await?;
//!     println!("{detalhes:#}");
//!     Ok(())
//! }
//! ```
//!
//! ## Wire contract
//!
//! The HTTP envelope is status-tag driven and Portuguese: HTTP 200 covers
//! both `"processado"` and `"nao processado"`, so callers must inspect the
//! `status` field rather than the HTTP code. See [`server::envelope`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::analyze;
pub use config::{AnalysisConfig, AnalysisConfigBuilder, DEFAULT_API_BASE_URL, DEFAULT_MODEL};
pub use error::AnalysisError;
pub use pipeline::fetch::{DocumentKind, DocumentPart};
pub use pipeline::gemini::{GeminiClient, GenerativeModel};
pub use server::{router, AppState};
