//! Configuration types for Bengali PDF transliteration.
//!
//! Every knob lives in [`TranslationConfig`], built via its
//! [`TranslationConfigBuilder`]. The same config drives text extraction, OCR,
//! transliteration and output-PDF layout, so two runs can be compared by
//! diffing their configs.

use crate::error::TranslitError;
use crate::pipeline::ocr::OcrEngine;
use crate::progress::ProgressCallback;
use crate::translit::{CaseStyle, ExceptionDictionary, Transliterator};
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for a Bengali PDF → English PDF transliteration.
///
/// Built via [`TranslationConfig::builder()`] or using
/// [`TranslationConfig::default()`].
///
/// # Example
/// ```rust
/// use bengali_pdf_translit::{CaseStyle, ExtractionMode, TranslationConfig};
///
/// let config = TranslationConfig::builder()
///     .mode(ExtractionMode::TextLayer)
///     .case_style(CaseStyle::Sentence)
///     .exception("অপু", "Apu")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct TranslationConfig {
    // ── Extraction ───────────────────────────────────────────────────────
    /// How Bengali text is obtained from the input. Default: [`ExtractionMode::Auto`].
    pub mode: ExtractionMode,

    /// Minimum cleaned text-layer length (in characters) for [`ExtractionMode::Auto`]
    /// to trust the text layer. Default: 50.
    ///
    /// Scanned PDFs frequently carry a handful of stray characters (page
    /// numbers, a producer stamp) in an otherwise empty text layer.
    pub min_text_chars: usize,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    // ── Rendering (OCR only) ─────────────────────────────────────────────
    /// Rendering DPI used when rasterising a page for OCR. Range: 72–400. Default: 300.
    ///
    /// Bengali glyphs carry small diacritics (chandrabindu, hasanta, nukta)
    /// that disappear below ~200 DPI on body-text sizes.
    pub dpi: u32,

    /// Maximum rendered image dimension (width or height) in pixels. Default: 2400.
    pub max_rendered_pixels: u32,

    /// Number of concurrent OCR calls. Default: 4.
    pub concurrency: usize,

    // ── OCR ──────────────────────────────────────────────────────────────
    /// Language hint passed to the OCR engine. Default: "Bengali".
    pub ocr_language: String,

    /// Vision model identifier for OCR, e.g. "gpt-4.1-mini".
    /// If None, uses provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, uses `ProviderFactory::from_env()`.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Pre-constructed OCR engine. Takes precedence over every provider setting.
    pub ocr_engine: Option<Arc<dyn OcrEngine>>,

    /// Sampling temperature for the OCR completion. Default: 0.1.
    pub temperature: f32,

    /// Maximum tokens the model may generate per page. Default: 4096.
    pub max_tokens: usize,

    /// Maximum retry attempts on a failed OCR call. Default: 3.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff). Default: 500.
    pub retry_backoff_ms: u64,

    /// Per-OCR-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Custom OCR system prompt. If None, uses the built-in prompt for `ocr_language`.
    pub system_prompt: Option<String>,

    // ── Transliteration ──────────────────────────────────────────────────
    /// Output casing. Default: [`CaseStyle::Lower`].
    pub case_style: CaseStyle,

    /// Extra whole-word spellings merged over the built-in dictionary.
    pub exceptions: HashMap<String, String>,

    /// JSON file of extra spellings, merged before [`Self::exceptions`].
    pub exceptions_file: Option<PathBuf>,

    // ── Output PDF ───────────────────────────────────────────────────────
    /// Title line at the top of the first output page.
    /// Default: "Bengali to English Transliteration".
    pub title: String,

    /// Output paper size. Default: A4.
    pub page_size: PageSize,

    /// Body font size in points. Range: 6–36. Default: 12.
    pub font_size: f32,

    /// Start every source page on a new output page. Default: false.
    pub preserve_page_breaks: bool,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::default(),
            min_text_chars: 50,
            pages: PageSelection::default(),
            password: None,
            dpi: 300,
            max_rendered_pixels: 2400,
            concurrency: 4,
            ocr_language: "Bengali".to_string(),
            model: None,
            provider_name: None,
            provider: None,
            ocr_engine: None,
            temperature: 0.1,
            max_tokens: 4096,
            max_retries: 3,
            retry_backoff_ms: 500,
            api_timeout_secs: 60,
            system_prompt: None,
            case_style: CaseStyle::default(),
            exceptions: HashMap::new(),
            exceptions_file: None,
            title: "Bengali to English Transliteration".to_string(),
            page_size: PageSize::default(),
            font_size: 12.0,
            preserve_page_breaks: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("mode", &self.mode)
            .field("min_text_chars", &self.min_text_chars)
            .field("pages", &self.pages)
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("concurrency", &self.concurrency)
            .field("ocr_language", &self.ocr_language)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("ocr_engine", &self.ocr_engine.as_ref().map(|_| "<dyn OcrEngine>"))
            .field("max_retries", &self.max_retries)
            .field("case_style", &self.case_style)
            .field("exceptions", &self.exceptions.len())
            .field("exceptions_file", &self.exceptions_file)
            .field("title", &self.title)
            .field("page_size", &self.page_size)
            .field("preserve_page_breaks", &self.preserve_page_breaks)
            .finish()
    }
}

impl TranslationConfig {
    /// Create a new builder for `TranslationConfig`.
    pub fn builder() -> TranslationConfigBuilder {
        TranslationConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build the [`Transliterator`] this config describes: built-in
    /// dictionary, then `exceptions_file`, then `exceptions`.
    pub fn transliterator(&self) -> Result<Transliterator, TranslitError> {
        let mut dict = ExceptionDictionary::built_in();
        if let Some(ref path) = self.exceptions_file {
            dict.load_json_file(path)?;
        }
        dict.extend(self.exceptions.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        Ok(Transliterator::with_exceptions(dict).case_style(self.case_style))
    }
}

/// Builder for [`TranslationConfig`].
#[derive(Debug)]
pub struct TranslationConfigBuilder {
    config: TranslationConfig,
}

impl TranslationConfigBuilder {
    pub fn mode(mut self, mode: ExtractionMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn min_text_chars(mut self, n: usize) -> Self {
        self.config.min_text_chars = n;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 400);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn ocr_language(mut self, language: impl Into<String>) -> Self {
        self.config.ocr_language = language.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.ocr_engine = Some(engine);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn case_style(mut self, style: CaseStyle) -> Self {
        self.config.case_style = style;
        self
    }

    /// Add one whole-word spelling override.
    pub fn exception(mut self, word: impl Into<String>, spelling: impl Into<String>) -> Self {
        self.config.exceptions.insert(word.into(), spelling.into());
        self
    }

    pub fn exceptions_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.exceptions_file = Some(path.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn font_size(mut self, pt: f32) -> Self {
        self.config.font_size = pt.clamp(6.0, 36.0);
        self
    }

    pub fn preserve_page_breaks(mut self, v: bool) -> Self {
        self.config.preserve_page_breaks = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TranslationConfig, TranslitError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 400 {
            return Err(TranslitError::InvalidConfig(format!(
                "DPI must be 72–400, got {}",
                c.dpi
            )));
        }
        if c.concurrency == 0 {
            return Err(TranslitError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if c.ocr_language.trim().is_empty() {
            return Err(TranslitError::InvalidConfig(
                "OCR language hint must not be empty".into(),
            ));
        }
        if !(6.0..=36.0).contains(&c.font_size) {
            return Err(TranslitError::InvalidConfig(format!(
                "Font size must be 6–36 pt, got {}",
                c.font_size
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Where the Bengali text comes from.
///
/// | Mode | Behaviour |
/// |------|-----------|
/// | `Auto` | Text layer if it looks real, else OCR for every selected page (default) |
/// | `TextLayer` | Text layer only; an empty layer is an error |
/// | `Ocr` | Always OCR, ignore the text layer |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExtractionMode {
    #[default]
    Auto,
    TextLayer,
    Ocr,
}

/// Specifies which pages of the PDF to process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Process all pages (default).
    #[default]
    All,
    /// Process a single page (1-indexed).
    Single(usize),
    /// Process a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Process specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// First requested page number (1-indexed) that is out of range, if any.
    pub fn first_out_of_range(&self, total_pages: usize) -> Option<usize> {
        match self {
            PageSelection::All => None,
            PageSelection::Single(p) => (*p == 0 || *p > total_pages).then_some(*p),
            PageSelection::Range(start, _) => (*start == 0 || *start > total_pages).then_some(*start),
            PageSelection::Set(pages) => pages.iter().copied().find(|&p| p == 0 || p > total_pages),
        }
    }
}

/// Output paper size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Width and height in millimetres.
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
        }
    }
}
