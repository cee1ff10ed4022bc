//! `.docx` → PDF conversion via a headless LibreOffice subprocess.
//!
//! ## Why a temp directory?
//!
//! `soffice` works on files, not byte streams. Writing the source document
//! into a `TempDir` gives the converter a path to chew on while guaranteeing
//! that both the source `.docx` and the produced `.pdf` are deleted when the
//! guard drops — on success, on error, and on panic alike. Nothing in this
//! module cleans up by hand.
//!
//! ## Converter resolution
//!
//! The executable is looked up in order: explicit config path, the
//! `SOFFICE_PATH` environment variable, per-platform well-known install
//! locations, and finally a bare `soffice` left to `PATH` resolution.

use crate::error::AnalysisError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info};

/// Well-known LibreOffice install locations, checked in order.
#[cfg(target_os = "windows")]
const CANDIDATES: &[&str] = &[
    "C:\\Program Files\\LibreOffice\\program\\soffice.exe",
    "C:\\Program Files (x86)\\LibreOffice\\program\\soffice.exe",
];

#[cfg(target_os = "macos")]
const CANDIDATES: &[&str] = &["/Applications/LibreOffice.app/Contents/MacOS/soffice"];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const CANDIDATES: &[&str] = &[
    "/usr/bin/soffice",
    "/usr/local/bin/soffice",
    "/opt/libreoffice/program/soffice",
];

/// Resolve the `soffice` executable to invoke.
///
/// An explicit path (config or `SOFFICE_PATH`) must exist; a missing explicit
/// path is an error rather than a silent fallback, because the operator
/// clearly intended that installation to be used.
pub fn resolve_converter(explicit: Option<&Path>) -> Result<PathBuf, AnalysisError> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(AnalysisError::ConverterNotFound {
            candidate: path.display().to_string(),
        });
    }

    if let Ok(env_path) = std::env::var("SOFFICE_PATH") {
        if !env_path.is_empty() {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                return Ok(path);
            }
            return Err(AnalysisError::ConverterNotFound {
                candidate: env_path,
            });
        }
    }

    for candidate in CANDIDATES {
        let path = PathBuf::from(candidate);
        if path.exists() {
            debug!("Resolved office converter: {}", path.display());
            return Ok(path);
        }
    }

    // Last resort: let the OS search PATH at spawn time.
    Ok(PathBuf::from("soffice"))
}

/// Convert a Word document to PDF bytes.
///
/// Writes `historico.docx` into a fresh temp directory, runs
/// `soffice --headless --convert-to pdf --outdir <dir>`, and reads back
/// `historico.pdf`. The directory and both files are removed when the
/// `TempDir` guard drops, whatever the outcome.
pub async fn docx_to_pdf(docx: &[u8], soffice: &Path) -> Result<Vec<u8>, AnalysisError> {
    let workdir = TempDir::new()
        .map_err(|e| AnalysisError::Conversion {
            detail: format!("failed to create temp dir: {e}"),
        })?;
    let result = docx_to_pdf_in(workdir.path(), docx, soffice).await;
    // `workdir` drops here, deleting the source and converted files on every
    // path out of this function.
    result
}

/// Conversion body, split out so the directory lifetime stays with the caller.
async fn docx_to_pdf_in(
    dir: &Path,
    docx: &[u8],
    soffice: &Path,
) -> Result<Vec<u8>, AnalysisError> {
    let docx_path = dir.join("historico.docx");
    let pdf_path = dir.join("historico.pdf");

    tokio::fs::write(&docx_path, docx)
        .await
        .map_err(|e| AnalysisError::Conversion {
            detail: format!("failed to write source file: {e}"),
        })?;

    info!("Converting {} via {}", docx_path.display(), soffice.display());

    let output = Command::new(soffice)
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(dir)
        .arg(&docx_path)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AnalysisError::ConverterNotFound {
                    candidate: soffice.display().to_string(),
                }
            } else {
                AnalysisError::Conversion {
                    detail: format!("failed to spawn converter: {e}"),
                }
            }
        })?;

    if !output.status.success() {
        return Err(AnalysisError::Conversion {
            detail: format!(
                "converter exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    // soffice writes the PDF next to the source with the same base name.
    tokio::fs::read(&pdf_path)
        .await
        .map_err(|e| AnalysisError::Conversion {
            detail: format!("converted PDF not readable: {e}"),
        })
}
