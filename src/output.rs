//! Result types returned by the entry points in [`crate::convert`].

use serde::{Deserialize, Serialize};

/// Where a page's Bengali text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextSource {
    /// The PDF's embedded text layer.
    TextLayer,
    /// OCR of the rendered page image.
    Ocr,
}

/// One source page, before and after transliteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number in the input PDF.
    pub page_num: usize,
    /// Cleaned Bengali text.
    pub bengali: String,
    /// Transliterated text. Empty until [`crate::translate`] fills it.
    pub english: String,
    pub source: TextSource,
    /// OCR retries spent on this page (0 for the text layer).
    pub retries: u32,
    /// OCR token usage, 0 for the text layer.
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub duration_ms: u64,
}

/// Text obtained from a PDF, before transliteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Page count of the input PDF.
    pub total_pages: usize,
    pub source: TextSource,
    /// Selected pages in page order.
    pub pages: Vec<PageText>,
}

impl ExtractedDocument {
    /// All page texts joined with a blank line.
    pub fn bengali_text(&self) -> String {
        join_pages(self.pages.iter().map(|p| p.bengali.as_str()))
    }
}

/// Aggregate statistics for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationStats {
    pub total_pages: usize,
    pub processed_pages: usize,
    pub source: Option<TextSource>,
    pub bengali_chars: usize,
    pub english_chars: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub extract_duration_ms: u64,
    pub transliterate_duration_ms: u64,
    pub write_duration_ms: u64,
    pub total_duration_ms: u64,
    /// Pages in the written output PDF (0 when no PDF was written).
    pub output_pages: usize,
}

/// Complete result of [`crate::translate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationOutput {
    /// Transliterated text of all selected pages, joined with a blank line.
    pub text: String,
    pub pages: Vec<PageText>,
    pub stats: TranslationStats,
}

pub(crate) fn join_pages<'a>(pages: impl Iterator<Item = &'a str>) -> String {
    pages
        .map(|p| p.trim_end_matches('\n'))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize, bengali: &str) -> PageText {
        PageText {
            page_num: n,
            bengali: bengali.to_string(),
            english: String::new(),
            source: TextSource::TextLayer,
            retries: 0,
            input_tokens: 0,
            output_tokens: 0,
            duration_ms: 0,
        }
    }

    #[test]
    fn bengali_text_joins_pages() {
        let doc = ExtractedDocument {
            total_pages: 2,
            source: TextSource::TextLayer,
            pages: vec![page(1, "কাক\n"), page(2, "বক")],
        };
        assert_eq!(doc.bengali_text(), "কাক\n\nবক");
    }

    #[test]
    fn output_serialises() {
        let out = TranslationOutput {
            text: "kak".into(),
            pages: vec![page(1, "কাক")],
            stats: TranslationStats::default(),
        };
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("\"TextLayer\""));
        assert!(json.contains("\"text\":\"kak\""));
    }
}
