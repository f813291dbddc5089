//! Static character tables for the Bengali block (U+0980–U+09FF).
//!
//! Two tables live here:
//!
//! * [`classify`]: a pure `match` that assigns every code point a
//!   [`CharacterClass`]. It drives the segmenter.
//! * [`MappingTables`]: code point → Romanised sound. Built exactly once
//!   behind a [`Lazy`] static and only ever handed out as a shared reference.
//!
//! Romanisation follows everyday Bengali spelling in English ("kobita",
//! "bhasha") rather than an academic scheme such as ISO 15919.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// The class of a single code point, as seen by the segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    /// অ আ ই … ঔ: a vowel written in its full form.
    IndependentVowel,
    /// ক … হ, ড় ঢ় য় ৎ: a consonant letter carrying an inherent "o".
    ConsonantBase,
    /// া ি ী … ৌ: a matra attached to the preceding consonant.
    VowelSign,
    /// ্ (hasanta / virama): joins consonants into a conjunct.
    ConjunctJoiner,
    /// ়: diacritic that modifies the consonant before it.
    Nukta,
    /// ঁ ং ঃ: chandrabindu, anusvara, visarga.
    Modifier,
    /// ০ … ৯
    Digit,
    /// ASCII/general punctuation and the dandas । ॥
    Punctuation,
    Whitespace,
    Other,
}

/// Hasanta (virama).
pub const HASANTA: char = '\u{09CD}';
/// Nukta.
pub const NUKTA: char = '\u{09BC}';

/// Classify one code point.
pub fn classify(ch: char) -> CharacterClass {
    use CharacterClass::*;

    match ch {
        '\u{0985}'..='\u{098C}' | '\u{098F}'..='\u{0990}' | '\u{0993}'..='\u{0994}' => {
            IndependentVowel
        }
        '\u{09E0}'..='\u{09E1}' => IndependentVowel,

        '\u{0995}'..='\u{09A8}'
        | '\u{09AA}'..='\u{09B0}'
        | '\u{09B2}'
        | '\u{09B6}'..='\u{09B9}'
        | '\u{09CE}'
        | '\u{09DC}'..='\u{09DD}'
        | '\u{09DF}'
        | '\u{09F0}'..='\u{09F1}' => ConsonantBase,

        '\u{09BE}'..='\u{09C4}'
        | '\u{09C7}'..='\u{09C8}'
        | '\u{09CB}'..='\u{09CC}'
        | '\u{09D7}'
        | '\u{09E2}'..='\u{09E3}' => VowelSign,

        HASANTA => ConjunctJoiner,
        NUKTA => Nukta,
        '\u{0981}'..='\u{0983}' => Modifier,
        '\u{09E6}'..='\u{09EF}' => Digit,
        '\u{0964}' | '\u{0965}' => Punctuation,

        c if c.is_whitespace() => Whitespace,
        c if c.is_ascii_punctuation() => Punctuation,
        // General Punctuation block: dashes, quotes, ellipsis, bullets.
        '\u{2010}'..='\u{2027}' | '\u{2030}'..='\u{205E}' => Punctuation,
        '\u{00A1}' | '\u{00AB}' | '\u{00B7}' | '\u{00BB}' | '\u{00BF}' => Punctuation,
        _ => Other,
    }
}

/// `true` for the dead consonant ৎ (khanda ta), which never carries a vowel.
pub fn is_dead_consonant(ch: char) -> bool {
    ch == '\u{09CE}'
}

/// Immutable code point → sound table.
#[derive(Debug)]
pub struct MappingTables {
    sounds: HashMap<char, &'static str>,
}

static BENGALI: Lazy<MappingTables> = Lazy::new(MappingTables::build);

impl MappingTables {
    /// The process-wide Bengali table.
    pub fn bengali() -> &'static MappingTables {
        &BENGALI
    }

    fn build() -> Self {
        let entries: &[(char, &'static str)] = &[
            // Independent vowels
            ('অ', "o"),
            ('আ', "a"),
            ('ই', "i"),
            ('ঈ', "ee"),
            ('উ', "u"),
            ('ঊ', "oo"),
            ('ঋ', "ri"),
            ('ঌ', "li"),
            ('এ', "e"),
            ('ঐ', "oi"),
            ('ও', "o"),
            ('ঔ', "ou"),
            ('ৠ', "rri"),
            ('ৡ', "lli"),
            // Vowel signs (kar)
            ('া', "a"),
            ('ি', "i"),
            ('ী', "ee"),
            ('ু', "u"),
            ('ূ', "oo"),
            ('ৃ', "ri"),
            ('ৄ', "rri"),
            ('ে', "e"),
            ('ৈ', "oi"),
            ('ো', "o"),
            ('ৌ', "ou"),
            ('ৗ', "ou"),
            ('ৢ', "li"),
            ('ৣ', "lli"),
            // Consonants
            ('ক', "k"),
            ('খ', "kh"),
            ('গ', "g"),
            ('ঘ', "gh"),
            ('ঙ', "ng"),
            ('চ', "ch"),
            ('ছ', "chh"),
            ('জ', "j"),
            ('ঝ', "jh"),
            ('ঞ', "ny"),
            ('ট', "t"),
            ('ঠ', "th"),
            ('ড', "d"),
            ('ঢ', "dh"),
            ('ণ', "n"),
            ('ত', "t"),
            ('থ', "th"),
            ('দ', "d"),
            ('ধ', "dh"),
            ('ন', "n"),
            ('প', "p"),
            ('ফ', "ph"),
            ('ব', "b"),
            ('ভ', "bh"),
            ('ম', "m"),
            ('য', "y"),
            ('র', "r"),
            ('ল', "l"),
            ('শ', "sh"),
            ('ষ', "sh"),
            ('স', "s"),
            ('হ', "h"),
            ('\u{09DC}', "r"),
            ('\u{09DD}', "rh"),
            ('\u{09DF}', "y"),
            ('ৎ', "t"),
            ('ৰ', "r"),
            ('ৱ', "w"),
            // Modifiers
            ('ঁ', ""),
            ('ং', "ng"),
            ('ঃ', "h"),
            (NUKTA, ""),
            (HASANTA, ""),
            // Digits
            ('০', "0"),
            ('১', "1"),
            ('২', "2"),
            ('৩', "3"),
            ('৪', "4"),
            ('৫', "5"),
            ('৬', "6"),
            ('৭', "7"),
            ('৮', "8"),
            ('৯', "9"),
            // Punctuation and signs
            ('।', "."),
            ('॥', ".."),
            ('ঽ', "'"),
        ];

        Self {
            sounds: entries.iter().copied().collect(),
        }
    }

    /// The mapped sound for `ch`, if the table has one.
    pub fn sound(&self, ch: char) -> Option<&'static str> {
        self.sounds.get(&ch).copied()
    }

    /// The sound for `ch`, or `ch` itself when unmapped.
    pub fn lookup_or_identity(&self, ch: char) -> Cow<'static, str> {
        match self.sound(ch) {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(ch.to_string()),
        }
    }

    /// Append the sound for `ch` to `out`, or `ch` itself when unmapped.
    pub fn push_sound_or_identity(&self, ch: char, out: &mut String) {
        match self.sound(ch) {
            Some(s) => out.push_str(s),
            None => out.push(ch),
        }
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_bengali_letters() {
        assert_eq!(classify('ক'), CharacterClass::ConsonantBase);
        assert_eq!(classify('\u{09DF}'), CharacterClass::ConsonantBase);
        assert_eq!(classify('ৎ'), CharacterClass::ConsonantBase);
        assert_eq!(classify('আ'), CharacterClass::IndependentVowel);
        assert_eq!(classify('া'), CharacterClass::VowelSign);
        assert_eq!(classify('ৌ'), CharacterClass::VowelSign);
        assert_eq!(classify(HASANTA), CharacterClass::ConjunctJoiner);
        assert_eq!(classify('ং'), CharacterClass::Modifier);
        assert_eq!(classify('ঁ'), CharacterClass::Modifier);
        assert_eq!(classify('৭'), CharacterClass::Digit);
        assert_eq!(classify('।'), CharacterClass::Punctuation);
    }

    #[test]
    fn classifies_non_bengali() {
        assert_eq!(classify(' '), CharacterClass::Whitespace);
        assert_eq!(classify('\n'), CharacterClass::Whitespace);
        assert_eq!(classify(','), CharacterClass::Punctuation);
        assert_eq!(classify('—'), CharacterClass::Punctuation);
        assert_eq!(classify('a'), CharacterClass::Other);
        assert_eq!(classify('7'), CharacterClass::Other);
        // Unassigned code point inside the Bengali block.
        assert_eq!(classify('\u{0984}'), CharacterClass::Other);
    }

    #[test]
    fn every_consonant_has_a_sound() {
        let tables = MappingTables::bengali();
        for cp in 0x0980u32..=0x09FF {
            let Some(ch) = char::from_u32(cp) else { continue };
            if classify(ch) == CharacterClass::ConsonantBase {
                assert!(tables.sound(ch).is_some(), "no sound for U+{cp:04X}");
            }
        }
    }

    #[test]
    fn table_is_shared() {
        let a = MappingTables::bengali() as *const _;
        let b = MappingTables::bengali() as *const _;
        assert_eq!(a, b);
        assert!(!MappingTables::bengali().is_empty());
    }

    #[test]
    fn identity_fallback() {
        let mut out = String::new();
        MappingTables::bengali().push_sound_or_identity('x', &mut out);
        MappingTables::bengali().push_sound_or_identity('ক', &mut out);
        assert_eq!(out, "xk");
    }
}
