//! Document retrieval: classify the transcript URL and fetch its bytes.
//!
//! Classification is by URL suffix only and happens *before* any network
//! I/O, so an unsupported extension never costs a download. The three
//! supported shapes all end up as one [`DocumentPart`] — bytes plus the MIME
//! type the model will be told — because the model accepts images and PDFs
//! through the same binary-part mechanism.

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::pipeline::office;
use tracing::{debug, info};

/// A fetched document ready to attach to the model request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPart {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// Document branches recognised by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// jpg / jpeg / png / tiff — sent to the model as-is.
    Image,
    /// pdf — sent to the model as-is.
    Pdf,
    /// docx — converted to PDF locally first.
    Word,
}

impl DocumentKind {
    /// Classify a URL by its lowercase suffix after the last `.`.
    pub fn from_url(url: &str) -> Result<Self, AnalysisError> {
        let extension = url
            .to_lowercase()
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_string();
        match extension.as_str() {
            "jpg" | "jpeg" | "png" | "tiff" => Ok(DocumentKind::Image),
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Word),
            _ => Err(AnalysisError::UnsupportedFileType { extension }),
        }
    }
}

/// Fetch the transcript document and normalise it to a [`DocumentPart`].
///
/// Word documents are downloaded, converted to PDF via LibreOffice, and the
/// conversion's temporary files are removed on every exit path (see
/// [`office::docx_to_pdf`]).
pub async fn fetch_document(
    url: &str,
    config: &AnalysisConfig,
) -> Result<DocumentPart, AnalysisError> {
    let kind = DocumentKind::from_url(url)?;
    debug!("Dispatching '{}' as {:?}", url, kind);

    let bytes = download(url, config.download_timeout_secs).await?;

    match kind {
        // The upstream service always labels the image branch as JPEG, even
        // for PNG/TIFF inputs; the model tolerates the mismatch and callers
        // depend on the existing behaviour.
        DocumentKind::Image => Ok(DocumentPart {
            bytes,
            mime_type: "image/jpeg",
        }),
        DocumentKind::Pdf => Ok(DocumentPart {
            bytes,
            mime_type: "application/pdf",
        }),
        DocumentKind::Word => {
            let soffice = office::resolve_converter(config.soffice_path.as_deref())?;
            let pdf = office::docx_to_pdf(&bytes, &soffice).await?;
            Ok(DocumentPart {
                bytes: pdf,
                mime_type: "application/pdf",
            })
        }
    }
}

/// Download raw bytes over HTTP, distinguishing timeouts from other
/// transport failures.
async fn download(url: &str, timeout_secs: u64) -> Result<Vec<u8>, AnalysisError> {
    info!("Downloading transcript from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AnalysisError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            AnalysisError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            AnalysisError::Download {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(AnalysisError::Download {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AnalysisError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    debug!("Downloaded {} bytes", bytes.len());
    Ok(bytes.to_vec())
}
