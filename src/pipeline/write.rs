//! Output PDF generation with `printpdf` 0.8.
//!
//! Layout is computed first as plain data ([`LaidOutPage`]) and only then
//! turned into printpdf `Op` lists, so pagination is testable without
//! parsing PDF bytes.
//!
//! The document is one flow: a centred title on the first page, then one
//! paragraph per input line. Long lines wrap at an estimated Helvetica
//! character width. A blank input line becomes one line of vertical space.

use crate::config::{PageSize, TranslationConfig};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use tracing::{debug, info, warn};

const MARGIN_PT: f32 = 72.0;
const BOTTOM_MARGIN_PT: f32 = 36.0;
const TITLE_SIZE_PT: f32 = 16.0;
const TITLE_SPACE_AFTER_PT: f32 = 30.0;
/// Average Helvetica advance as a fraction of the font size.
const AVG_CHAR_WIDTH_EM: f32 = 0.5;

/// One positioned line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub x: f32,
    /// Baseline, in points from the bottom of the page.
    pub y: f32,
    pub text: String,
    pub is_title: bool,
}

/// One output page after layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub lines: Vec<PlacedLine>,
}

/// Lays out and serialises transliterated text as a PDF.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    page_size: PageSize,
    title: String,
    font_size: f32,
    page_breaks: bool,
}

impl PdfWriter {
    pub fn new(page_size: PageSize, title: impl Into<String>, font_size: f32) -> Self {
        Self {
            page_size,
            title: title.into(),
            font_size,
            page_breaks: false,
        }
    }

    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(config.page_size, config.title.clone(), config.font_size)
            .page_breaks(config.preserve_page_breaks)
    }

    /// Start every source page on a new output page.
    pub fn page_breaks(mut self, v: bool) -> Self {
        self.page_breaks = v;
        self
    }

    fn page_dimensions_pt(&self) -> (f32, f32) {
        let (w, h) = self.page_size.dimensions_mm();
        (Mm(w).into_pt().0, Mm(h).into_pt().0)
    }

    fn line_height(&self) -> f32 {
        self.font_size * 1.2
    }

    /// Characters that fit on one body line.
    pub fn max_chars_per_line(&self) -> usize {
        let (w, _) = self.page_dimensions_pt();
        let usable = w - 2.0 * MARGIN_PT;
        ((usable / (AVG_CHAR_WIDTH_EM * self.font_size)) as usize).max(1)
    }

    /// Lay out `sections` (one per source page) into output pages.
    pub fn layout(&self, sections: &[String]) -> Vec<LaidOutPage> {
        let (page_w, page_h) = self.page_dimensions_pt();
        let top = page_h - MARGIN_PT;
        let bottom = BOTTOM_MARGIN_PT;
        let line_h = self.line_height();
        let max_chars = self.max_chars_per_line();

        let mut pages = vec![LaidOutPage::default()];
        let mut y = top;

        if !self.title.trim().is_empty() {
            let title = pdf_safe(self.title.trim());
            let title_w = title.chars().count() as f32 * AVG_CHAR_WIDTH_EM * TITLE_SIZE_PT;
            let x = ((page_w - title_w) / 2.0).max(MARGIN_PT);
            y -= TITLE_SIZE_PT;
            pages[0].lines.push(PlacedLine {
                x,
                y,
                text: title,
                is_title: true,
            });
            y -= TITLE_SPACE_AFTER_PT;
        }

        for (i, section) in sections.iter().enumerate() {
            if i > 0 && self.page_breaks {
                pages.push(LaidOutPage::default());
                y = top;
            }

            for paragraph in section.split('\n') {
                if paragraph.trim().is_empty() {
                    y -= line_h;
                    continue;
                }

                for line in wrap_text(&pdf_safe(paragraph.trim()), max_chars) {
                    if y - line_h < bottom {
                        pages.push(LaidOutPage::default());
                        y = top;
                    }
                    y -= line_h;
                    if let Some(page) = pages.last_mut() {
                        page.lines.push(PlacedLine {
                            x: MARGIN_PT,
                            y,
                            text: line,
                            is_title: false,
                        });
                    }
                }
                y -= self.font_size * 0.5;
            }
        }

        pages
    }

    /// Produce the PDF bytes and the number of output pages.
    pub fn render(&self, sections: &[String]) -> (Vec<u8>, usize) {
        let pages = self.layout(sections);
        let (page_w, page_h) = self.page_size.dimensions_mm();
        let title = if self.title.trim().is_empty() {
            "Transliteration"
        } else {
            self.title.trim()
        };

        info!(
            "Writing PDF: {} pages, {} lines",
            pages.len(),
            pages.iter().map(|p| p.lines.len()).sum::<usize>()
        );

        let pdf_pages: Vec<PdfPage> = pages
            .iter()
            .map(|page| PdfPage::new(Mm(page_w), Mm(page_h), self.page_ops(page)))
            .collect();
        let count = pdf_pages.len();

        let mut doc = PdfDocument::new(title);
        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!("printpdf reported {} warnings", warnings.len());
        }
        debug!("PDF serialised: {} bytes", bytes.len());

        (bytes, count)
    }

    fn page_ops(&self, page: &LaidOutPage) -> Vec<Op> {
        let mut ops = Vec::with_capacity(page.lines.len() * 5);
        for line in &page.lines {
            let (font, size) = if line.is_title {
                (BuiltinFont::HelveticaBold, TITLE_SIZE_PT)
            } else {
                (BuiltinFont::Helvetica, self.font_size)
            };
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(line.x),
                    y: Pt(line.y),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(size),
                font,
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.text.clone())],
                font,
            });
            ops.push(Op::EndTextSection);
        }
        ops
    }
}

/// Replace characters the built-in fonts cannot encode (outside Latin-1)
/// with `?`, and tabs with spaces.
pub fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' => ' ',
            c if (c as u32) < 0x100 && !c.is_control() => c,
            _ => '?',
        })
        .collect()
}

/// Word-wrap `text` so no line exceeds `max_width` characters. Words longer
/// than `max_width` are force-broken.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut result = Vec::new();
    let mut current = String::with_capacity(max_width);
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_width {
            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            let mut chunks = chars.chunks(max_width).peekable();
            while let Some(chunk) = chunks.next() {
                if chunks.peek().is_some() {
                    result.push(chunk.iter().collect());
                } else {
                    current = chunk.iter().collect();
                    current_len = chunk.len();
                }
            }
        } else if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            result.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        result.push(current);
    }
    result
}
