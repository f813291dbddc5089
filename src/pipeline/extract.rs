//! Text-layer extraction via pdfium.
//!
//! Runs inside `spawn_blocking` for the same reason rendering does: pdfium
//! is a blocking C library and must stay off the Tokio worker threads.

use crate::error::TranslitError;
use crate::pipeline::pdfium;
use std::path::Path;
use tracing::{debug, info};

/// Text layer of the selected pages.
#[derive(Debug, Clone)]
pub struct TextLayer {
    /// Page count of the whole document.
    pub total_pages: usize,
    /// `(page_index_0based, raw text)` in page order.
    pub pages: Vec<(usize, String)>,
}

/// Page count of a PDF without reading any page content.
pub async fn page_count(pdf_path: &Path, password: Option<&str>) -> Result<usize, TranslitError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(str::to_string);

    tokio::task::spawn_blocking(move || -> Result<usize, TranslitError> {
        let pdfium = pdfium::bind()?;
        let document = pdfium::open(&pdfium, &path, pwd.as_deref())?;
        let count = document.pages().len() as usize;
        Ok(count)
    })
    .await
    .map_err(|e| TranslitError::Internal(format!("Page-count task panicked: {}", e)))?
}

/// Read the embedded text of the selected pages.
pub async fn extract_text_layer(
    pdf_path: &Path,
    password: Option<&str>,
    page_indices: &[usize],
) -> Result<TextLayer, TranslitError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(str::to_string);
    let indices = page_indices.to_vec();

    tokio::task::spawn_blocking(move || extract_blocking(&path, pwd.as_deref(), &indices))
        .await
        .map_err(|e| TranslitError::Internal(format!("Extract task panicked: {}", e)))?
}

fn extract_blocking(
    pdf_path: &Path,
    password: Option<&str>,
    page_indices: &[usize],
) -> Result<TextLayer, TranslitError> {
    let pdfium = pdfium::bind()?;
    let document = pdfium::open(&pdfium, pdf_path, password)?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let mut out = Vec::with_capacity(page_indices.len());
    for &idx in page_indices {
        if idx >= total_pages {
            return Err(TranslitError::PageOutOfRange {
                page: idx + 1,
                total: total_pages,
            });
        }

        let page = pages
            .get(idx as u16)
            .map_err(|e| TranslitError::TextExtractionFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;
        let text = page
            .text()
            .map_err(|e| TranslitError::TextExtractionFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?
            .all();

        debug!("Page {}: {} chars in text layer", idx + 1, text.chars().count());
        out.push((idx, text));
    }

    Ok(TextLayer {
        total_pages,
        pages: out,
    })
}

/// Whether an extracted text layer is real text rather than scanner noise:
/// more than `min_chars` characters once trimmed, at least one alphanumeric.
pub fn has_meaningful_text(text: &str, min_chars: usize) -> bool {
    let trimmed = text.trim();
    trimmed.chars().count() > min_chars && trimmed.chars().any(char::is_alphanumeric)
}
