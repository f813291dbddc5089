//! Canonical composition of Bengali text before segmentation.
//!
//! Extracted and OCR'd text often carries the decomposed spellings of a few
//! letters, or invisible joiners that only matter to a font shaper:
//!
//! | Input                  | Output |
//! |------------------------|--------|
//! | ে + া (U+09C7 U+09BE)  | ো      |
//! | ে + ৗ (U+09C7 U+09D7)  | ৌ      |
//! | ড + ়                  | ড়      |
//! | ঢ + ়                  | ঢ়      |
//! | য + ়                  | য়      |
//! | ZWJ / ZWNJ / ZWSP / BOM | removed |
//!
//! The segmenter then sees one code point per letter and the mapper never has
//! to reason about split vowel signs.

use super::tables::NUKTA;

const E_KAR: char = '\u{09C7}';
const AA_KAR: char = '\u{09BE}';
const AU_LENGTH_MARK: char = '\u{09D7}';

fn is_invisible(ch: char) -> bool {
    matches!(ch, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}')
}

fn compose_nukta(base: char) -> Option<char> {
    match base {
        '\u{09A1}' => Some('\u{09DC}'),
        '\u{09A2}' => Some('\u{09DD}'),
        '\u{09AF}' => Some('\u{09DF}'),
        _ => None,
    }
}

/// Normalise `text` into the composed form the segmenter expects.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().filter(|&c| !is_invisible(c)).peekable();

    while let Some(c) = chars.next() {
        if c == E_KAR {
            match chars.peek() {
                Some(&AA_KAR) => {
                    chars.next();
                    out.push('\u{09CB}');
                    continue;
                }
                Some(&AU_LENGTH_MARK) => {
                    chars.next();
                    out.push('\u{09CC}');
                    continue;
                }
                _ => {}
            }
        }

        if chars.peek() == Some(&NUKTA) {
            if let Some(composed) = compose_nukta(c) {
                chars.next();
                out.push(composed);
                continue;
            }
        }

        out.push(c);
    }

    out
}
