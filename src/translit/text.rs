//! Text-level composition: words, separators, exceptions and casing.

use super::exceptions::ExceptionDictionary;
use super::mapper::Mapper;
use super::normalize::normalize;
use super::segment::{Cluster, Segmenter};
use super::tables::MappingTables;
use serde::{Deserialize, Serialize};

/// Output casing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CaseStyle {
    /// Mapper output as-is (lowercase); exception spellings keep their case.
    #[default]
    Lower,
    /// Additionally upper-case the first letter of every line and sentence.
    Sentence,
}

/// Bengali → phonetic English transliterator.
///
/// Holds only immutable data after construction, so one instance can be
/// shared by reference across threads (e.g. one per OCR'd page).
#[derive(Debug, Clone)]
pub struct Transliterator {
    tables: &'static MappingTables,
    exceptions: ExceptionDictionary,
    case_style: CaseStyle,
}

impl Default for Transliterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Transliterator {
    /// Built-in tables and exception dictionary, lowercase output.
    pub fn new() -> Self {
        Self::with_exceptions(ExceptionDictionary::built_in())
    }

    pub fn with_exceptions(exceptions: ExceptionDictionary) -> Self {
        Self {
            tables: MappingTables::bengali(),
            exceptions,
            case_style: CaseStyle::default(),
        }
    }

    pub fn case_style(mut self, style: CaseStyle) -> Self {
        self.case_style = style;
        self
    }

    pub fn exceptions(&self) -> &ExceptionDictionary {
        &self.exceptions
    }

    /// Sound of a single code point, or the code point itself when unmapped.
    pub fn transliterate_char(&self, ch: char) -> String {
        self.tables.lookup_or_identity(ch).into_owned()
    }

    /// Transliterate one word. Surrounding whitespace is trimmed and
    /// punctuation attached to it maps the same way [`Self::transliterate`]
    /// maps it; the case style is not applied.
    pub fn transliterate_word(&self, word: &str) -> String {
        self.map_text(word.trim())
    }

    /// Transliterate arbitrary text, preserving line breaks, spacing and
    /// punctuation positions.
    pub fn transliterate(&self, text: &str) -> String {
        let out = self.map_text(text);
        match self.case_style {
            CaseStyle::Lower => out,
            CaseStyle::Sentence => sentence_case(&out),
        }
    }

    fn map_text(&self, text: &str) -> String {
        let text = normalize(text);
        let mapper = Mapper::new(self.tables);
        let mut out = String::with_capacity(text.len());
        let mut word: Vec<Cluster<'_>> = Vec::new();
        let mut word_start = 0;

        for cluster in Segmenter::new(&text) {
            if cluster.kind.is_boundary() {
                self.flush_word(&mapper, &text, word_start, &mut word, &mut out);
                let (piece, _) = mapper.map_cluster(&cluster, Default::default());
                out.push_str(&piece);
            } else {
                if word.is_empty() {
                    word_start = offset_in(&text, cluster.text);
                }
                word.push(cluster);
            }
        }
        self.flush_word(&mapper, &text, word_start, &mut word, &mut out);
        out
    }

    fn flush_word<'a>(
        &self,
        mapper: &Mapper<'_>,
        text: &'a str,
        start: usize,
        word: &mut Vec<Cluster<'a>>,
        out: &mut String,
    ) {
        let Some(last) = word.last() else {
            return;
        };
        let end = offset_in(text, last.text) + last.text.len();
        match self.exceptions.lookup(&text[start..end]) {
            Some(spelling) => out.push_str(spelling),
            None => out.push_str(&mapper.map_word(word)),
        }
        word.clear();
    }
}

/// Byte offset of `part` inside `whole`; `part` must be a sub-slice of it.
fn offset_in(whole: &str, part: &str) -> usize {
    part.as_ptr() as usize - whole.as_ptr() as usize
}

/// Upper-case the first letter of each line and of each sentence.
pub fn sentence_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_start = true;
    let mut after_terminator = false;

    for ch in text.chars() {
        if ch == '\n' {
            at_start = true;
            after_terminator = false;
            out.push(ch);
            continue;
        }
        if ch.is_whitespace() {
            if after_terminator {
                at_start = true;
                after_terminator = false;
            }
            out.push(ch);
            continue;
        }
        after_terminator = matches!(ch, '.' | '!' | '?');
        if at_start && ch.is_alphanumeric() {
            out.extend(ch.to_uppercase());
            at_start = false;
        } else {
            if ch.is_alphanumeric() {
                at_start = false;
            }
            out.push(ch);
        }
    }

    out
}
