//! Entry points: extract, transliterate, and write.
//!
//! ```text
//! extract_text   PDF ──▶ Bengali text per page (text layer or OCR)
//! translate      PDF ──▶ Bengali ──▶ English text
//! translate_pdf  PDF ──▶ Bengali ──▶ English ──▶ PDF file
//! ```

use crate::config::{ExtractionMode, TranslationConfig};
use crate::error::TranslitError;
use crate::output::{
    join_pages, ExtractedDocument, PageText, TextSource, TranslationOutput, TranslationStats,
};
use crate::pipeline::extract::{self, has_meaningful_text};
use crate::pipeline::ocr::{OcrEngine, VisionOcr};
use crate::pipeline::write::PdfWriter;
use crate::pipeline::{input, postprocess, render};
use edgequake_llm::{LLMProvider, ProviderFactory};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Vision model used when a provider is named without a model.
pub const DEFAULT_OCR_MODEL: &str = "gpt-4.1-mini";

/// Obtain the Bengali text of the selected pages.
///
/// With [`ExtractionMode::Auto`] the text layer is tried first; if it is
/// too short, has no alphanumeric content, or cannot be read at all, every
/// selected page is OCR'd instead.
///
/// # Errors
/// - File not found / permission denied / not a PDF / corrupt or locked PDF
/// - A selected page is out of range
/// - [`TranslitError::NoExtractableText`] in `TextLayer` mode on a scanned PDF
/// - OCR provider missing, OCR failure, or empty recognition on any page
pub async fn extract_text(
    input_path: impl AsRef<Path>,
    config: &TranslationConfig,
) -> Result<ExtractedDocument, TranslitError> {
    // ── Step 1: Validate input ───────────────────────────────────────────
    let pdf_path = input::resolve_input(input_path)?;
    info!("Extracting text from {}", pdf_path.display());

    // ── Step 2: Compute page indices ─────────────────────────────────────
    let total_pages = extract::page_count(&pdf_path, config.password.as_deref()).await?;
    if let Some(page) = config.pages.first_out_of_range(total_pages) {
        return Err(TranslitError::PageOutOfRange {
            page,
            total: total_pages,
        });
    }
    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(TranslitError::PageOutOfRange {
            page: 0,
            total: total_pages,
        });
    }
    debug!("Selected {} of {} pages", page_indices.len(), total_pages);

    // ── Step 3: Text layer, OCR, or both ─────────────────────────────────
    let pages = match config.mode {
        ExtractionMode::Ocr => ocr_pages(&pdf_path, &page_indices, config).await?,
        ExtractionMode::TextLayer => {
            let pages = text_layer_pages(&pdf_path, &page_indices, config).await?;
            let chars = total_chars(&pages);
            if !has_meaningful_text(&join_bengali(&pages), config.min_text_chars) {
                return Err(TranslitError::NoExtractableText {
                    path: pdf_path,
                    chars,
                });
            }
            report_text_layer(&pages, config);
            pages
        }
        ExtractionMode::Auto => {
            match text_layer_pages(&pdf_path, &page_indices, config).await {
                Ok(pages)
                    if has_meaningful_text(&join_bengali(&pages), config.min_text_chars) =>
                {
                    info!("Text layer extraction successful");
                    report_text_layer(&pages, config);
                    pages
                }
                Ok(pages) => {
                    info!(
                        "Text layer has only {} characters; PDF appears image-based, switching to OCR",
                        total_chars(&pages)
                    );
                    ocr_pages(&pdf_path, &page_indices, config).await?
                }
                Err(e) => {
                    warn!("Text layer extraction failed: {}; trying OCR", e);
                    ocr_pages(&pdf_path, &page_indices, config).await?
                }
            }
        }
    };

    let source = pages.first().map_or(TextSource::TextLayer, |p| p.source);
    if let Some(ref cb) = config.progress_callback {
        cb.on_complete(pages.len());
    }

    Ok(ExtractedDocument {
        total_pages,
        source,
        pages,
    })
}

/// Extract and transliterate the selected pages.
pub async fn translate(
    input_path: impl AsRef<Path>,
    config: &TranslationConfig,
) -> Result<TranslationOutput, TranslitError> {
    let total_start = Instant::now();

    // Fail fast on a bad exception file before touching the PDF.
    let transliterator = config.transliterator()?;

    let extract_start = Instant::now();
    let extracted = extract_text(input_path, config).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    let translit_start = Instant::now();
    let mut pages = extracted.pages;
    for page in &mut pages {
        page.english = transliterator.transliterate(&page.bengali);
    }
    let text = join_pages(pages.iter().map(|p| p.english.as_str()));
    let transliterate_duration_ms = translit_start.elapsed().as_millis() as u64;

    let stats = TranslationStats {
        total_pages: extracted.total_pages,
        processed_pages: pages.len(),
        source: Some(extracted.source),
        bengali_chars: total_chars(&pages),
        english_chars: text.chars().count(),
        total_input_tokens: pages.iter().map(|p| p.input_tokens as u64).sum(),
        total_output_tokens: pages.iter().map(|p| p.output_tokens as u64).sum(),
        extract_duration_ms,
        transliterate_duration_ms,
        write_duration_ms: 0,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        output_pages: 0,
    };

    info!(
        "Transliterated {} pages ({} → {} chars) in {}ms",
        stats.processed_pages, stats.bengali_chars, stats.english_chars, stats.total_duration_ms
    );

    Ok(TranslationOutput { text, pages, stats })
}

/// Full PDF → PDF workflow.
///
/// The output is written atomically (temp file + rename); missing parent
/// directories are created.
pub async fn translate_pdf(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &TranslationConfig,
) -> Result<TranslationStats, TranslitError> {
    let total_start = Instant::now();
    let output = translate(input_path, config).await?;
    let path = output_path.as_ref();

    // ── Layout + serialise ───────────────────────────────────────────────
    let write_start = Instant::now();
    let sections: Vec<String> = if config.preserve_page_breaks {
        output.pages.iter().map(|p| p.english.clone()).collect()
    } else {
        vec![output.text.clone()]
    };
    let writer = PdfWriter::from_config(config);
    let (bytes, output_pages) = tokio::task::spawn_blocking(move || writer.render(&sections))
        .await
        .map_err(|e| TranslitError::PdfWriteFailed(format!("PDF writer panicked: {}", e)))?;

    // ── Atomic write ─────────────────────────────────────────────────────
    write_atomic(path, &bytes).await?;
    info!("Wrote {} ({} pages, {} bytes)", path.display(), output_pages, bytes.len());

    let mut stats = output.stats;
    stats.output_pages = output_pages;
    stats.write_duration_ms = write_start.elapsed().as_millis() as u64;
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    Ok(stats)
}

/// Synchronous wrapper around [`translate`].
///
/// Creates a temporary tokio runtime internally.
pub fn translate_sync(
    input_path: impl AsRef<Path>,
    config: &TranslationConfig,
) -> Result<TranslationOutput, TranslitError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| TranslitError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(translate(input_path, config))
}

/// Write `bytes` to `path` via a sibling temp file and a rename.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), TranslitError> {
    let io_err = |e: std::io::Error| TranslitError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, bytes).await.map_err(io_err)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(io_err(e));
    }
    Ok(())
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn text_layer_pages(
    pdf_path: &Path,
    page_indices: &[usize],
    config: &TranslationConfig,
) -> Result<Vec<PageText>, TranslitError> {
    let start = Instant::now();
    let layer =
        extract::extract_text_layer(pdf_path, config.password.as_deref(), page_indices).await?;
    let duration_ms = start.elapsed().as_millis() as u64;

    Ok(layer
        .pages
        .into_iter()
        .map(|(idx, raw)| PageText {
            page_num: idx + 1,
            bengali: postprocess::clean_text(&raw),
            english: String::new(),
            source: TextSource::TextLayer,
            retries: 0,
            input_tokens: 0,
            output_tokens: 0,
            duration_ms,
        })
        .collect())
}

/// Text-layer pages are read in one pass, so progress is reported afterwards.
fn report_text_layer(pages: &[PageText], config: &TranslationConfig) {
    if let Some(ref cb) = config.progress_callback {
        let total = pages.len();
        cb.on_start(total, TextSource::TextLayer);
        for page in pages {
            cb.on_page_start(page.page_num, total);
            cb.on_page_complete(page.page_num, total, page.bengali.chars().count());
        }
    }
}

async fn ocr_pages(
    pdf_path: &Path,
    page_indices: &[usize],
    config: &TranslationConfig,
) -> Result<Vec<PageText>, TranslitError> {
    let engine = resolve_engine(config)?;
    let total = page_indices.len();
    info!("Running OCR with '{}' on {} pages", engine.name(), total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_start(total, TextSource::Ocr);
    }

    let rendered = render::render_pages(pdf_path, config, page_indices).await?;
    let engine: &dyn OcrEngine = engine.as_ref();
    let language = config.ocr_language.as_str();

    let mut results: Vec<(usize, Result<PageText, TranslitError>)> =
        stream::iter(rendered.into_iter().map(|(idx, image)| async move {
            let page_num = idx + 1;
            let start = Instant::now();
            if let Some(ref cb) = config.progress_callback {
                cb.on_page_start(page_num, total);
            }

            let result = engine
                .recognize(page_num, image, language)
                .await
                .and_then(|rec| {
                    let bengali = postprocess::clean_text(&rec.text);
                    if bengali.is_empty() {
                        return Err(TranslitError::EmptyRecognition { page: page_num });
                    }
                    Ok(PageText {
                        page_num,
                        bengali,
                        english: String::new(),
                        source: TextSource::Ocr,
                        retries: rec.retries,
                        input_tokens: rec.input_tokens,
                        output_tokens: rec.output_tokens,
                        duration_ms: start.elapsed().as_millis() as u64,
                    })
                });

            if let Some(ref cb) = config.progress_callback {
                match &result {
                    Ok(page) => cb.on_page_complete(page_num, total, page.bengali.chars().count()),
                    Err(e) => cb.on_page_error(page_num, total, &e.to_string()),
                }
            }
            (idx, result)
        }))
        .buffer_unordered(config.concurrency)
        .collect()
        .await;

    // Report the earliest failing page, not whichever finished first.
    results.sort_by_key(|(idx, _)| *idx);
    results.into_iter().map(|(_, r)| r).collect()
}

/// Resolve the OCR engine, from most-specific to least-specific.
///
/// 1. **Pre-built engine** (`config.ocr_engine`), used as-is.
/// 2. **Pre-built provider** (`config.provider`) wrapped in [`VisionOcr`].
/// 3. **Named provider + model** (`config.provider_name`) via
///    [`ProviderFactory::create_llm_provider`].
/// 4. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`).
/// 5. **OpenAI** when `OPENAI_API_KEY` is set.
/// 6. **Full auto-detection** (`ProviderFactory::from_env`).
fn resolve_engine(config: &TranslationConfig) -> Result<Arc<dyn OcrEngine>, TranslitError> {
    if let Some(ref engine) = config.ocr_engine {
        return Ok(Arc::clone(engine));
    }
    let provider = resolve_provider(config)?;
    Ok(Arc::new(VisionOcr::new(provider, config)))
}

fn create_vision_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, TranslitError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        TranslitError::OcrProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

fn resolve_provider(config: &TranslationConfig) -> Result<Arc<dyn LLMProvider>, TranslitError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_OCR_MODEL);
        return create_vision_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_vision_provider(&prov, &model);
        }
    }

    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_OCR_MODEL);
            return create_vision_provider("openai", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| TranslitError::OcrProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "OCR needs a vision model and none could be auto-detected from the environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY or GEMINI_API_KEY, or pass --provider.\n\
                For PDFs with a text layer, --mode text avoids OCR entirely.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

fn join_bengali(pages: &[PageText]) -> String {
    join_pages(pages.iter().map(|p| p.bengali.as_str()))
}

fn total_chars(pages: &[PageText]) -> usize {
    pages.iter().map(|p| p.bengali.chars().count()).sum()
}
