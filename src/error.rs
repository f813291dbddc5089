//! Error types for the bengali-pdf-translit library.
//!
//! Transliteration itself never fails: unknown code points pass through
//! verbatim. Everything that can fail lives around it (reading the input PDF,
//! OCR, writing the output PDF), and every such failure is fatal for the
//! document. There is no per-page partial result; a page that cannot be
//! extracted or recognised aborts the run with a [`TranslitError`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the bengali-pdf-translit library.
#[derive(Debug, Error)]
pub enum TranslitError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf input.pdf repaired.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium could not read the text layer of a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// Text layer was empty and OCR was disabled by the extraction mode.
    #[error(
        "No extractable text in '{path}' (text layer has {chars} characters).\n\
The PDF is probably scanned. Re-run with --mode auto or --mode ocr."
    )]
    NoExtractableText { path: PathBuf, chars: usize },

    /// The OCR provider is not initialised (missing API key etc.).
    #[error("OCR provider '{provider}' is not configured.\n{hint}")]
    OcrProviderNotConfigured { provider: String, hint: String },

    /// OCR of a page failed after all retries.
    #[error("OCR failed for page {page} after {retries} retries: {detail}")]
    OcrFailed {
        page: usize,
        retries: u32,
        detail: String,
    },

    /// OCR call exceeded the configured per-call timeout on every attempt.
    #[error("OCR timed out after {secs}s on page {page}\nIncrease --api-timeout or lower --dpi.")]
    OcrTimeout { page: usize, secs: u64 },

    /// OCR ran but recognised nothing on the page.
    #[error("OCR returned no text for page {page}\nCheck the page is not blank, or raise --dpi.")]
    EmptyRecognition { page: usize },

    // ── Output errors ─────────────────────────────────────────────────────
    /// printpdf could not produce the output document.
    #[error("Failed to build output PDF: {0}")]
    PdfWriteFailed(String),

    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// A user exception file could not be read or parsed.
    #[error("Cannot load exception dictionary '{path}': {detail}\nExpected a JSON object of {{\"word\": \"spelling\"}} pairs.")]
    ExceptionsLoad { path: PathBuf, detail: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDFium must be installed to read PDFs. You can:\n\
  • Install it system-wide so the loader can find libpdfium.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_pdf_display() {
        let e = TranslitError::NotAPdf {
            path: "notes.txt".into(),
            magic: *b"hell",
        };
        let msg = e.to_string();
        assert!(msg.contains("notes.txt"), "got: {msg}");
    }

    #[test]
    fn no_extractable_text_suggests_ocr() {
        let e = TranslitError::NoExtractableText {
            path: "scan.pdf".into(),
            chars: 3,
        };
        let msg = e.to_string();
        assert!(msg.contains("--mode ocr"), "got: {msg}");
        assert!(msg.contains("3 characters"));
    }

    #[test]
    fn ocr_failed_display() {
        let e = TranslitError::OcrFailed {
            page: 2,
            retries: 3,
            detail: "503".into(),
        };
        assert!(e.to_string().contains("page 2"));
        assert!(e.to_string().contains("3 retries"));
    }

    #[test]
    fn ocr_timeout_display() {
        let e = TranslitError::OcrTimeout { page: 4, secs: 60 };
        assert!(e.to_string().contains("60s"));
        assert!(e.to_string().contains("page 4"));
    }

    #[test]
    fn exceptions_load_display() {
        let e = TranslitError::ExceptionsLoad {
            path: "words.json".into(),
            detail: "expected value".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("words.json"));
        assert!(msg.contains(r#"{"word": "spelling"}"#), "got: {msg}");
    }

    #[test]
    fn output_write_keeps_source() {
        use std::error::Error as _;
        let e = TranslitError::OutputWriteFailed {
            path: "out.pdf".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("disk full"));
    }
}
