//! # bengali-pdf-translit
//!
//! Phonetic Bengali → English (Latin script) transliteration, and a
//! PDF → PDF pipeline around it.
//!
//! The core ([`translit`]) is a pure, deterministic, rule-based engine:
//! Unicode text in, romanised text out, no I/O. The pipeline gets Bengali text
//! out of a PDF (embedded text layer, or OCR through a vision model when the
//! PDF is scanned), transliterates it and writes a new PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      validate the local file and %PDF magic
//!  ├─ 2. Extract    text layer via pdfium (spawn_blocking)
//!  │     └─ OCR     if the layer is empty: render → PNG → vision model
//!  ├─ 3. Clean      deterministic post-processing
//!  ├─ 4. Translit   segment → map → exceptions → casing
//!  └─ 5. Write      title + wrapped lines via printpdf, atomic rename
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use bengali_pdf_translit::Transliterator;
//!
//! let t = Transliterator::new();
//! assert_eq!(t.transliterate("পথের পাঁচালী"), "pother pachali");
//! ```
//!
//! ```rust,no_run
//! use bengali_pdf_translit::{translate_pdf, TranslationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TranslationConfig::default();
//!     let stats = translate_pdf("input/bengali.pdf", "output/english.pdf", &config).await?;
//!     eprintln!("{} pages, {} chars", stats.processed_pages, stats.english_chars);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `bn2en` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! OCR is only needed for scanned PDFs. The provider is auto-detected from
//! `OPENAI_API_KEY` / `ANTHROPIC_API_KEY` / `GEMINI_API_KEY`, or injected via
//! [`TranslationConfigBuilder::provider`] / [`TranslationConfigBuilder::ocr_engine`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod selftest;
pub mod translit;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ExtractionMode, PageSelection, PageSize, TranslationConfig, TranslationConfigBuilder,
};
pub use convert::{extract_text, translate, translate_pdf, translate_sync};
pub use error::TranslitError;
pub use output::{ExtractedDocument, PageText, TextSource, TranslationOutput, TranslationStats};
pub use pipeline::ocr::{OcrEngine, Recognition, VisionOcr};
pub use progress::{NoopProgressCallback, ProgressCallback, TranslationProgressCallback};
pub use selftest::{run_self_test, SelfTestReport};
pub use translit::{CaseStyle, ExceptionDictionary, Transliterator};
